//! Persisted configuration trait

use crate::config::{Date, PlantName, SensorCalibration, Settings};

/// Errors that can occur persisting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The write could not be scheduled or performed
    WriteFailed,
    /// The store has not been loaded yet
    Unavailable,
}

/// Individually addressable configuration entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingKey {
    Name,
    StartDate,
    MoistureThreshold,
    SensorCalibration,
}

/// Value of one configuration entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingValue {
    Name(PlantName),
    StartDate(Date),
    MoistureThreshold(i32),
    SensorCalibration(Option<SensorCalibration>),
}

impl SettingValue {
    pub fn key(&self) -> SettingKey {
        match self {
            SettingValue::Name(_) => SettingKey::Name,
            SettingValue::StartDate(_) => SettingKey::StartDate,
            SettingValue::MoistureThreshold(_) => SettingKey::MoistureThreshold,
            SettingValue::SensorCalibration(_) => SettingKey::SensorCalibration,
        }
    }
}

/// Durable key/value configuration
///
/// `set` must not return until the new value is visible to `settings`;
/// the write to non-volatile storage may complete later.
pub trait SettingsStore {
    /// Current view of every setting
    fn settings(&self) -> &Settings;

    /// Replace one setting and schedule it for persistence
    fn set(&mut self, value: SettingValue) -> Result<(), StorageError>;

    fn get(&self, key: SettingKey) -> SettingValue {
        let settings = self.settings();
        match key {
            SettingKey::Name => SettingValue::Name(settings.name.clone()),
            SettingKey::StartDate => SettingValue::StartDate(settings.start_date),
            SettingKey::MoistureThreshold => {
                SettingValue::MoistureThreshold(settings.moisture_threshold)
            }
            SettingKey::SensorCalibration => {
                SettingValue::SensorCalibration(settings.calibration)
            }
        }
    }

    fn commit_moisture_threshold(&mut self, threshold: i32) -> Result<(), StorageError> {
        self.set(SettingValue::MoistureThreshold(threshold))
    }

    fn commit_start_date(&mut self, date: Date) -> Result<(), StorageError> {
        self.set(SettingValue::StartDate(date))
    }

    fn commit_sensor_calibration(
        &mut self,
        calibration: SensorCalibration,
    ) -> Result<(), StorageError> {
        self.set(SettingValue::SensorCalibration(Some(calibration)))
    }
}
