//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use verdant_core::config::{SensorCalibration, Settings};
use verdant_core::input::DecodedEvent;
use verdant_core::traits::Frame;
use verdant_drivers::moisture::CalibrationError;

/// Pending decoded input events
///
/// A single slot: the encoder task drops events while the controller is
/// still busy with the previous one.
const INPUT_CHANNEL_SIZE: usize = 1;

/// Decoded encoder events (encoder task -> controller)
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, DecodedEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Latest screen contents (controller and calibration -> LCD task)
pub static SCREEN: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Settings record to write to flash (controller -> settings task)
pub static SETTINGS_SAVE: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// Request to run the dry/wet calibration (controller -> sensor task)
pub static CALIBRATION_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Outcome of a calibration run (sensor task -> controller)
pub static CALIBRATION_RESULT: Signal<
    CriticalSectionRawMutex,
    Result<SensorCalibration, CalibrationError>,
> = Signal::new();

/// Latest moisture reading in percent (sensor task -> controller)
pub static MOISTURE_READING: Signal<CriticalSectionRawMutex, i32> = Signal::new();
