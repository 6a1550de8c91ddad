//! Collaborator traits consumed by the menu and idle logic
//!
//! These traits abstract the hardware and storage so the core logic
//! can be tested on the host.

pub mod clock;
pub mod display;
pub mod sensor;
pub mod settings;

pub use clock::Clock;
pub use display::{CharacterDisplay, DisplayError, Frame, Line, LINE_WIDTH};
pub use sensor::{Calibrator, MoistureSensor, SensorError};
pub use settings::{SettingKey, SettingValue, SettingsStore, StorageError};
