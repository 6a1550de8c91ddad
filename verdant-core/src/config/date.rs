//! Calendar dates
//!
//! Proleptic Gregorian dates with day counting, enough to answer "how
//! many days since the plant was started".

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Check month and day against the calendar
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
    }

    /// Days since 1970-01-01 (negative before)
    pub fn days_since_epoch(&self) -> i32 {
        // Shift the year so it starts in March; the leap day is then the
        // last day of the shifted year.
        let y = self.year as i32 - (self.month <= 2) as i32;
        let m = self.month as i32;
        let d = self.day as i32;

        let era = (if y >= 0 { y } else { y - 399 }) / 400;
        let yoe = y - era * 400;
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

        era * 146_097 + doe - 719_468
    }

    /// Whole days from `earlier` to `self`; negative if `earlier` is later
    pub fn days_since(&self, earlier: Date) -> i32 {
        self.days_since_epoch() - earlier.days_since_epoch()
    }
}

/// Renders as `Y.M.D` without zero padding, e.g. `2024.3.7`
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.month, self.day)
    }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}
