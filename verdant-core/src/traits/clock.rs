//! Time source trait

use crate::config::Date;

/// Monotonic time plus the calendar date
pub trait Clock {
    /// Milliseconds since boot, never decreasing
    fn now_ms(&self) -> u64;

    /// Current calendar date
    fn today(&self) -> Date;
}
