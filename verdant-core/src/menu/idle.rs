//! Idle fallback to the status screen

use super::machine::MenuStateMachine;
use super::MenuError;
use crate::traits::{Calibrator, CharacterDisplay, Clock, MoistureSensor, SettingsStore};

/// Polled idle timer
///
/// Once no event has been handled for `threshold_ms`, every check
/// re-renders the status screen and resets the menu. The activity
/// timestamp is left alone, so the status screen keeps refreshing on
/// each poll until the user touches the encoder again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleMonitor {
    threshold_ms: u64,
}

impl IdleMonitor {
    pub const fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// Returns true if the status screen was shown
    pub fn check<D, S, K, C, M>(
        &self,
        now_ms: u64,
        menu: &mut MenuStateMachine<D, S, K, C>,
        sensor: &mut M,
    ) -> Result<bool, MenuError>
    where
        D: CharacterDisplay,
        S: SettingsStore,
        K: Clock,
        C: Calibrator,
        M: MoistureSensor,
    {
        if menu.is_calibrating() {
            return Ok(false);
        }

        if now_ms.saturating_sub(menu.last_event_ms()) < self.threshold_ms {
            return Ok(false);
        }

        let percent = sensor.read_percent()?;
        menu.show_status(percent)?;
        Ok(true)
    }
}
