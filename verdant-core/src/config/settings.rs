//! Persisted settings record
//!
//! Everything the station remembers across power cycles. The record
//! is serialized to flash with postcard and guarded by a magic number,
//! a format version and a CRC over the payload.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::date::Date;
use crate::traits::SettingValue;

/// Magic number to identify a valid settings record
pub const SETTINGS_MAGIC: u32 = 0x56524454; // "VRDT"

/// Current settings record version
pub const SETTINGS_VERSION: u8 = 1;

/// Maximum plant name length
pub const PLANT_NAME_LEN: usize = 16;

pub type PlantName = String<PLANT_NAME_LEN>;

/// Raw sensor readings for a bone-dry and a soaked probe
///
/// `min` is taken in the dry phase and `max` in the wet phase.
/// Capacitive probes read *lower* when wet, so `min` is usually the
/// larger value; the percentage math does not care which way round
/// the span goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorCalibration {
    pub min: u32,
    pub max: u32,
}

impl SensorCalibration {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Scale a raw reading to a percentage of the calibrated span
    ///
    /// Truncates toward zero and is not clamped. A zero span yields 0.
    pub fn percent(&self, reading: u16) -> i32 {
        self.percent_of_samples(reading as u64, 1)
    }

    /// Same as [`percent`](Self::percent) for the mean of `count`
    /// readings summing to `sum`, without rounding the mean first
    pub fn percent_of_samples(&self, sum: u64, count: u32) -> i32 {
        let span = self.max as i64 - self.min as i64;
        if span == 0 || count == 0 {
            return 0;
        }
        let count = count as i64;
        let offset = sum as i64 - self.min as i64 * count;
        (offset * 100 / (span * count)) as i32
    }
}

/// Complete settings record stored in flash
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Magic number for validation
    pub magic: u32,
    /// Record format version
    pub version: u8,
    /// Plant name shown on the status screen
    pub name: PlantName,
    /// Day the plant was started
    pub start_date: Date,
    /// Moisture threshold in percent
    pub moisture_threshold: i32,
    /// Probe calibration, if one has been run
    pub calibration: Option<SensorCalibration>,
    /// CRC32 checksum (calculated over magic..calibration)
    pub crc: u32,
}

impl Settings {
    /// Create a record with no calibration
    ///
    /// Names longer than [`PLANT_NAME_LEN`] are truncated.
    pub fn new(name: &str, start_date: Date, moisture_threshold: i32) -> Self {
        let mut stored = PlantName::new();
        for c in name.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }

        let mut settings = Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            name: stored,
            start_date,
            moisture_threshold,
            calibration: None,
            crc: 0,
        };
        settings.update_crc();
        settings
    }

    /// Check if the header matches (magic and version)
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC && self.version == SETTINGS_VERSION
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Replace one entry and refresh the CRC
    pub fn apply(&mut self, value: SettingValue) {
        match value {
            SettingValue::Name(name) => self.name = name,
            SettingValue::StartDate(date) => self.start_date = date,
            SettingValue::MoistureThreshold(threshold) => self.moisture_threshold = threshold,
            SettingValue::SensorCalibration(calibration) => self.calibration = calibration,
        }
        self.update_crc();
    }

    /// Days from the start date to `today`
    ///
    /// A start date in the future (the clock restarted behind a date
    /// committed earlier) counts as day 0.
    pub fn days_grown(&self, today: Date) -> i32 {
        today.days_since(self.start_date).max(0)
    }

    /// Calculate CRC32 over everything except the crc field itself
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;

        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &[self.name.len() as u8]);
        crc = crc32_update(crc, self.name.as_bytes());
        crc = crc32_update(crc, &self.start_date.year.to_le_bytes());
        crc = crc32_update(crc, &[self.start_date.month, self.start_date.day]);
        crc = crc32_update(crc, &self.moisture_threshold.to_le_bytes());
        match self.calibration {
            Some(cal) => {
                crc = crc32_update(crc, &[1]);
                crc = crc32_update(crc, &cal.min.to_le_bytes());
                crc = crc32_update(crc, &cal.max.to_le_bytes());
            }
            None => crc = crc32_update(crc, &[0]),
        }

        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }
}

/// Bitwise CRC32 (IEEE 802.3, reflected)
fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (POLY & mask);
        }
    }

    crc
}
