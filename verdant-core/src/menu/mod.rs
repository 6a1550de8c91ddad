//! Display menu
//!
//! The menu state machine consumes decoded input events, walks the
//! mode hierarchy and renders two-line screens. The idle monitor is
//! polled separately and falls back to the status screen when the
//! user has been away for a while.

pub mod idle;
pub mod machine;
pub mod mode;

pub use idle::IdleMonitor;
pub use machine::{DisplayState, MenuStateMachine};
pub use mode::{MenuMode, MENU_ITEMS};

use crate::traits::{DisplayError, SensorError, StorageError};

/// Errors surfaced by the menu and idle monitor
///
/// Any collaborator failure is reported as-is; the caller decides
/// whether it is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// Rendering failed
    Display(DisplayError),
    /// Persisting a setting failed
    Storage(StorageError),
    /// Reading or calibrating the sensor failed
    Sensor(SensorError),
    /// An event arrived while the previous one was still being handled
    Busy,
}

impl From<DisplayError> for MenuError {
    fn from(e: DisplayError) -> Self {
        MenuError::Display(e)
    }
}

impl From<StorageError> for MenuError {
    fn from(e: StorageError) -> Self {
        MenuError::Storage(e)
    }
}

impl From<SensorError> for MenuError {
    fn from(e: SensorError) -> Self {
        MenuError::Sensor(e)
    }
}
