//! Menu state machine
//!
//! Owns the display state and is the only thing that mutates it. Every
//! handled event updates the activity timestamp, applies the
//! transition for the current mode and re-renders the screen.
//!
//! ```text
//!            press (cursor 0..3)
//!   Menu ───────────────────────▶ ViewStartDate / SetStartDate /
//!    ▲                            SetMoistureThreshold / CalibrateSensor
//!    └────────────────────────────────────┘
//!        press (commits threshold when leaving SetMoistureThreshold)
//! ```
//!
//! `CalibrateSensor` never stays on screen: rendering it starts the
//! calibration run and drops straight back to `Menu`.

use core::cell::RefCell;

use super::mode::{clamp_menu_cursor, MenuMode, MENU_ITEMS};
use super::MenuError;
use crate::config::SensorCalibration;
use crate::input::{DecodedEvent, EventListener};
use crate::traits::display::format_line;
use crate::traits::{Calibrator, CharacterDisplay, Clock, SettingsStore};

/// Everything the menu tracks between events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub mode: MenuMode,
    /// Menu index in `Menu`, signed offset from the stored threshold in
    /// `SetMoistureThreshold`
    pub cursor: i32,
    /// Threshold shown while adjusting; committed on leaving the mode
    pub pending_threshold: i32,
    /// Time of the last handled event
    pub last_event_ms: u64,
}

/// Menu state machine over its collaborators
pub struct MenuStateMachine<D, S, K, C>
where
    D: CharacterDisplay,
    S: SettingsStore,
    K: Clock,
    C: Calibrator,
{
    display: D,
    settings: S,
    clock: K,
    calibrator: C,
    state: DisplayState,
    calibrating: bool,
}

impl<D, S, K, C> MenuStateMachine<D, S, K, C>
where
    D: CharacterDisplay,
    S: SettingsStore,
    K: Clock,
    C: Calibrator,
{
    /// Create the state machine in `Menu` and render the first screen
    pub fn new(display: D, settings: S, clock: K, calibrator: C) -> Result<Self, MenuError> {
        let now = clock.now_ms();
        let mut machine = Self {
            display,
            settings,
            clock,
            calibrator,
            state: DisplayState {
                last_event_ms: now,
                ..DisplayState::default()
            },
            calibrating: false,
        };
        machine.render()?;
        Ok(machine)
    }

    /// Process one decoded event
    ///
    /// While a calibration run owns the screen only the activity
    /// timestamp is refreshed.
    pub fn handle(&mut self, event: DecodedEvent) -> Result<(), MenuError> {
        self.touch();

        if self.calibrating {
            return Ok(());
        }

        match event {
            DecodedEvent::RotateClockwise | DecodedEvent::RotateCounterClockwise => {
                self.state.cursor = self.state.cursor.saturating_add(event.rotation_delta());
            }
            DecodedEvent::ButtonRelease => {}
            DecodedEvent::ButtonPress => self.press()?,
        }

        self.render()
    }

    fn press(&mut self) -> Result<(), MenuError> {
        match self.state.mode {
            MenuMode::Menu => {
                let index = clamp_menu_cursor(self.state.cursor);
                self.state.mode = MenuMode::from_menu_index(index);
            }
            MenuMode::SetMoistureThreshold => {
                self.settings
                    .commit_moisture_threshold(self.state.pending_threshold)?;
                self.state.mode = MenuMode::Menu;
            }
            MenuMode::ViewStartDate | MenuMode::SetStartDate | MenuMode::CalibrateSensor => {
                self.state.mode = MenuMode::Menu;
            }
        }
        self.state.cursor = 0;
        Ok(())
    }

    /// Draw the screen for the current mode
    pub fn render(&mut self) -> Result<(), MenuError> {
        match self.state.mode {
            MenuMode::Menu => {
                let index = clamp_menu_cursor(self.state.cursor);
                self.state.cursor = index as i32;

                let line1 = format_line(format_args!(">{}", MENU_ITEMS[index]));
                let line2 = match MENU_ITEMS.get(index + 1) {
                    Some(next) => format_line(format_args!(" {}", next)),
                    None => format_line(format_args!("")),
                };
                self.display.render(&line1, &line2)?;
            }
            MenuMode::ViewStartDate => {
                let date = self.settings.settings().start_date;
                let line2 = format_line(format_args!("Date: {}", date));
                self.display.render("Current Start ", &line2)?;
            }
            MenuMode::SetStartDate => {
                let today = self.clock.today();
                self.settings.commit_start_date(today)?;
                let line2 = format_line(format_args!(" To: {}", today));
                self.display.render("Start Date Set", &line2)?;
            }
            MenuMode::SetMoistureThreshold => {
                let base = self.settings.settings().moisture_threshold;
                self.state.pending_threshold = base.saturating_add(self.state.cursor);
                let line2 = format_line(format_args!("   New: {}%", self.state.pending_threshold));
                self.display.render("Set Moisture", &line2)?;
            }
            MenuMode::CalibrateSensor => {
                self.start_calibration()?;
            }
        }
        Ok(())
    }

    /// Hand the screen to a calibration run
    ///
    /// The menu resets to its first entry and stays quiet until
    /// [`calibration_complete`](Self::calibration_complete) or
    /// [`calibration_failed`](Self::calibration_failed) is called.
    pub fn start_calibration(&mut self) -> Result<(), MenuError> {
        self.calibrator.begin()?;
        self.calibrating = true;
        self.reset_to_menu();
        Ok(())
    }

    /// Commit the result of a finished calibration run
    ///
    /// The run's final screen is left in place; the idle timer restarts
    /// so it stays visible for a full idle period.
    pub fn calibration_complete(&mut self, calibration: SensorCalibration) -> Result<(), MenuError> {
        self.settings.commit_sensor_calibration(calibration)?;
        self.calibrating = false;
        self.touch();
        Ok(())
    }

    /// Abandon a calibration run without touching the settings
    pub fn calibration_failed(&mut self) -> Result<(), MenuError> {
        self.calibrating = false;
        self.reset_to_menu();
        self.touch();
        self.display.render("Calibration", "Failed")?;
        Ok(())
    }

    /// Draw the status screen and fall back to the top of the menu
    ///
    /// Does not count as activity.
    pub fn show_status(&mut self, moisture_percent: i32) -> Result<(), MenuError> {
        let settings = self.settings.settings();
        let days = settings.days_grown(self.clock.today());
        let line1 = format_line(format_args!("{}: Day {}", settings.name, days));
        let line2 = format_line(format_args!("Moisture: {}%", moisture_percent));

        self.display.render(&line1, &line2)?;
        self.reset_to_menu();
        Ok(())
    }

    fn reset_to_menu(&mut self) {
        self.state.mode = MenuMode::Menu;
        self.state.cursor = 0;
    }

    fn touch(&mut self) {
        let now = self.clock.now_ms();
        self.state.last_event_ms = self.state.last_event_ms.max(now);
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn mode(&self) -> MenuMode {
        self.state.mode
    }

    pub fn cursor(&self) -> i32 {
        self.state.cursor
    }

    pub fn pending_threshold(&self) -> i32 {
        self.state.pending_threshold
    }

    pub fn last_event_ms(&self) -> u64 {
        self.state.last_event_ms
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn calibrator(&self) -> &C {
        &self.calibrator
    }
}

/// Shared menu behind a `RefCell` so it can sit in an
/// [`EventDispatcher`](crate::input::EventDispatcher)
///
/// A nested delivery while an event is still being handled is
/// rejected with [`MenuError::Busy`].
impl<D, S, K, C> EventListener for RefCell<MenuStateMachine<D, S, K, C>>
where
    D: CharacterDisplay,
    S: SettingsStore,
    K: Clock,
    C: Calibrator,
{
    type Error = MenuError;

    fn on_event(&self, event: DecodedEvent) -> Result<(), MenuError> {
        let mut menu = self.try_borrow_mut().map_err(|_| MenuError::Busy)?;
        menu.handle(event)
    }
}
