//! Firmware configuration
//!
//! Compiled-in defaults from plant.toml and the settings record kept
//! in flash.

pub mod defaults;
pub mod persistence;

pub use persistence::{load_settings, save_settings};
