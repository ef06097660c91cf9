//! Time-of-day intervals
//!
//! All scheduling comparisons run on minutes since midnight, parsed once at
//! the boundary from either 24-hour (`"09:30"`, `"09:30:00"`) or 12-hour
//! (`"9:30 AM"`) strings. Intervals are half-open: two intervals that merely
//! touch at an endpoint do not overlap.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchedulerError};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Half-open time range within a single day, minute resolution.
///
/// Invariant: `from_min < to_min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Inclusive start, minutes since midnight
    pub from_min: u16,
    /// Exclusive end, minutes since midnight
    pub to_min: u16,
}

impl TimeInterval {
    /// Build an interval from minute counts, enforcing `from < to`.
    pub fn new(from_min: u16, to_min: u16) -> Result<Self> {
        if from_min >= to_min {
            return Err(SchedulerError::Validation(format!(
                "interval start must precede end ({} >= {})",
                format_minutes(from_min),
                format_minutes(to_min)
            )));
        }
        if to_min > MINUTES_PER_DAY {
            return Err(SchedulerError::Validation(format!(
                "interval end {} exceeds end of day",
                to_min
            )));
        }
        Ok(Self { from_min, to_min })
    }

    /// Build an interval from hour/minute pairs. Convenience for catalogs
    /// and tests.
    pub fn from_hm(from_h: u16, from_m: u16, to_h: u16, to_m: u16) -> Result<Self> {
        // Multiply in u32 so absurd hour arguments fail validation instead
        // of wrapping.
        let from = u32::from(from_h) * 60 + u32::from(from_m);
        let to = u32::from(to_h) * 60 + u32::from(to_m);
        if from > u32::from(MINUTES_PER_DAY) || to > u32::from(MINUTES_PER_DAY) {
            return Err(SchedulerError::Validation(format!(
                "time of day out of range: {from_h:02}:{from_m:02}-{to_h:02}:{to_m:02}"
            )));
        }
        Self::new(from as u16, to as u16)
    }

    /// Parse from a pair of time-of-day strings (24-hour or AM/PM form).
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(parse_time_of_day(from)?, parse_time_of_day(to)?)
    }

    /// Half-open overlap test. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.from_min < other.to_min && other.from_min < self.to_min
    }

    /// Whether `self` fully covers `inner`. Strictly stronger than overlap:
    /// used to decide staff eligibility, where partial coverage is not
    /// sufficient.
    pub fn contains(&self, inner: &TimeInterval) -> bool {
        self.from_min <= inner.from_min && self.to_min >= inner.to_min
    }

    /// Duration in minutes.
    pub fn duration_min(&self) -> u16 {
        self.to_min - self.from_min
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_minutes(self.from_min), format_minutes(self.to_min))
    }
}

/// Render a minute count as 24-hour `HH:MM`.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse a time-of-day string into minutes since midnight.
///
/// Accepts `"HH:MM"`, `"HH:MM:SS"` and `"H:MM AM"`/`"H:MM PM"` (case
/// insensitive). Seconds are truncated; the scheduler works at minute
/// resolution.
pub fn parse_time_of_day(input: &str) -> Result<u16> {
    let trimmed = input.trim();
    for format in ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"] {
        if let Ok(t) = NaiveTime::parse_from_str(&trimmed.to_uppercase(), format) {
            use chrono::Timelike;
            return Ok((t.hour() * 60 + t.minute()) as u16);
        }
    }
    Err(SchedulerError::Validation(format!("unrecognized time of day: {trimmed:?}")))
}
