//! Defaults generated from plant.toml by build.rs

use verdant_core::config::{Date, Settings};
use verdant_drivers::moisture::CalibrationTiming;

include!(concat!(env!("OUT_DIR"), "/plant_defaults.rs"));

/// Settings used when flash holds nothing usable
pub fn default_settings() -> Settings {
    Settings::new(PLANT_NAME, START_DATE, MOISTURE_THRESHOLD)
}
