//! Configuration types
//!
//! Calendar dates and the persisted settings record.

pub mod date;
pub mod settings;

pub use date::Date;
pub use settings::{
    PlantName, SensorCalibration, Settings, PLANT_NAME_LEN, SETTINGS_MAGIC, SETTINGS_VERSION,
};
