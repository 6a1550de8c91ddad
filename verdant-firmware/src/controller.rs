//! Collaborators handed to the menu state machine
//!
//! The menu itself is hardware-agnostic; these adapters connect it to
//! the rest of the firmware through the channels in [`crate::channels`].

use defmt::*;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_rp::peripherals::RTC;
use embassy_time::Instant;

use verdant_core::config::{Date, Settings};
use verdant_core::input::{DecodedEvent, EventListener};
use verdant_core::menu::MenuError;
use verdant_core::traits::{
    Calibrator, CharacterDisplay, Clock, DisplayError, Frame, MoistureSensor, SensorError,
    SettingValue, SettingsStore, StorageError,
};

use crate::channels::{CALIBRATION_REQUEST, MOISTURE_READING, SCREEN, SETTINGS_SAVE};

/// Display that hands frames to the LCD task
///
/// Never fails itself; bus errors surface in the LCD task.
pub struct ScreenOutput;

impl CharacterDisplay for ScreenOutput {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        SCREEN.signal(Frame::new(line1, line2));
        Ok(())
    }
}

/// In-memory settings with deferred flash writes
///
/// Every change is visible immediately and queued for the settings
/// task, which coalesces bursts into a single flash write.
pub struct SettingsHandle {
    settings: Settings,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for SettingsHandle {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn set(&mut self, value: SettingValue) -> Result<(), StorageError> {
        debug!("setting {} changed", value.key());
        self.settings.apply(value);
        SETTINGS_SAVE.signal(self.settings.clone());
        Ok(())
    }
}

/// Uptime plus the RP2040 real-time clock
pub struct BoardClock {
    rtc: Rtc<'static, RTC>,
    fallback: Date,
}

impl BoardClock {
    /// Start the RTC at `initial` and use it for calendar dates
    pub fn new(mut rtc: Rtc<'static, RTC>, initial: Date) -> Self {
        if let Err(e) = rtc.set_datetime(to_datetime(initial)) {
            warn!("RTC rejected initial date: {:?}", Debug2Format(&e));
        }
        Self {
            rtc,
            fallback: initial,
        }
    }
}

impl Clock for BoardClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn today(&self) -> Date {
        match self.rtc.now() {
            Ok(now) => Date::new(now.year, now.month, now.day),
            Err(_) => {
                warn!("RTC not running, using fallback date");
                self.fallback
            }
        }
    }
}

fn to_datetime(date: Date) -> DateTime {
    DateTime {
        year: date.year,
        month: date.month,
        day: date.day,
        day_of_week: day_of_week(date),
        hour: 0,
        minute: 0,
        second: 0,
    }
}

/// 1970-01-01 was a Thursday
fn day_of_week(date: Date) -> DayOfWeek {
    match (date.days_since_epoch() + 4).rem_euclid(7) {
        0 => DayOfWeek::Sunday,
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        _ => DayOfWeek::Saturday,
    }
}

/// Starts calibration runs on the sensor task
pub struct CalibrationTrigger;

impl Calibrator for CalibrationTrigger {
    fn begin(&mut self) -> Result<(), SensorError> {
        info!("Requesting sensor calibration");
        CALIBRATION_REQUEST.signal(());
        Ok(())
    }
}

/// Last moisture reading published by the sensor task
#[derive(Default)]
pub struct MoistureCache {
    percent: Option<i32>,
}

impl MoistureCache {
    /// Pick up a newer reading, if the sensor task published one
    pub fn refresh(&mut self) {
        if let Some(percent) = MOISTURE_READING.try_take() {
            self.percent = Some(percent);
        }
    }
}

impl MoistureSensor for MoistureCache {
    /// Reports 0% until the first reading arrives
    fn read_percent(&mut self) -> Result<i32, SensorError> {
        self.refresh();
        Ok(self.percent.unwrap_or(0))
    }
}

/// Logs every decoded event ahead of the menu
pub struct EventLogger;

impl EventListener for EventLogger {
    type Error = MenuError;

    fn on_event(&self, event: DecodedEvent) -> Result<(), MenuError> {
        debug!("Input: {}", event);
        Ok(())
    }
}
