//! Moisture sensor traits

/// Errors reported by the moisture sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    Adc,
    /// No dry/wet calibration is available to scale readings
    NotCalibrated,
    /// A calibration run is already in progress
    CalibrationBusy,
}

/// Source of the current soil moisture
pub trait MoistureSensor {
    /// Latest moisture as a percentage of the calibrated span
    ///
    /// Not clamped: a reading outside the calibrated range yields a
    /// value below 0 or above 100.
    fn read_percent(&mut self) -> Result<i32, SensorError>;
}

/// Starts a dry/wet calibration run
///
/// The run itself is long (tens of seconds) and drives its own prompts
/// on the display, so `begin` only kicks it off. Completion is reported
/// back to the menu separately.
pub trait Calibrator {
    fn begin(&mut self) -> Result<(), SensorError>;
}
