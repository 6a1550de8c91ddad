//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod encoder;
pub mod lcd;
pub mod sensor;
pub mod settings;
pub mod tick;

pub use controller::controller_task;
pub use encoder::encoder_task;
pub use lcd::lcd_task;
pub use sensor::sensor_task;
pub use settings::settings_task;
pub use tick::tick_task;
