//! Weekly availability rules and venue-wide blocked dates

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::time::TimeInterval;
use crate::constants::default_working_window;
use crate::errors::{Result, SchedulerError};

/// Whether a staff member works on a given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Blocked,
}

/// One weekday's rule for one staff member. Exactly one rule per staff per
/// weekday; the full set is replaced wholesale on every schedule edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: String,
    pub staff_id: String,
    pub weekday: Weekday,
    pub status: AvailabilityStatus,
    /// Present only when available. Fully blocked days carry no window.
    pub window: Option<TimeInterval>,
}

impl AvailabilityRule {
    /// Whether this rule's window fully covers the requested interval.
    /// Blocked days and rules without a window never cover anything.
    pub fn covers(&self, interval: &TimeInterval) -> bool {
        match (self.status, &self.window) {
            (AvailabilityStatus::Available, Some(window)) => window.contains(interval),
            _ => false,
        }
    }
}

/// Admin-side payload for one weekday when replacing a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScheduleEntry {
    pub weekday: Weekday,
    pub status: AvailabilityStatus,
    pub window: Option<TimeInterval>,
}

impl DayScheduleEntry {
    pub fn available(weekday: Weekday, window: TimeInterval) -> Self {
        Self { weekday, status: AvailabilityStatus::Available, window: Some(window) }
    }

    pub fn blocked(weekday: Weekday) -> Self {
        Self { weekday, status: AvailabilityStatus::Blocked, window: None }
    }

    /// Resolve the effective window: an available day submitted without
    /// explicit hours defaults to the venue working window (07:00-20:00).
    pub fn effective_window(&self) -> Option<TimeInterval> {
        match self.status {
            AvailabilityStatus::Available => {
                Some(self.window.unwrap_or_else(default_working_window))
            }
            AvailabilityStatus::Blocked => None,
        }
    }
}

/// A full weekly schedule: exactly one entry per weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    entries: Vec<DayScheduleEntry>,
}

impl WeekSchedule {
    /// Validate that the payload holds exactly one entry per weekday.
    pub fn new(entries: Vec<DayScheduleEntry>) -> Result<Self> {
        if entries.len() != 7 {
            return Err(SchedulerError::Validation(format!(
                "weekly schedule needs 7 entries, got {}",
                entries.len()
            )));
        }
        let mut seen = [false; 7];
        for entry in &entries {
            let idx = entry.weekday.num_days_from_monday() as usize;
            if seen[idx] {
                return Err(SchedulerError::Validation(format!(
                    "duplicate entry for {:?}",
                    entry.weekday
                )));
            }
            seen[idx] = true;
        }
        Ok(Self { entries })
    }

    /// The default week seeded when a staff record is created without
    /// explicit hours: every day available 07:00-20:00.
    pub fn default_week() -> Self {
        let entries = all_weekdays()
            .iter()
            .map(|&weekday| DayScheduleEntry::available(weekday, default_working_window()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[DayScheduleEntry] {
        &self.entries
    }
}

/// The seven weekdays in Monday-first order.
pub fn all_weekdays() -> [Weekday; 7] {
    use chrono::Weekday::*;
    [Mon, Tue, Wed, Thu, Fri, Sat, Sun]
}

/// Venue-wide exclusion, full-day or partial, independent of any booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDate {
    pub id: String,
    pub date: NaiveDate,
    /// Absent interval blocks the entire date.
    pub interval: Option<TimeInterval>,
    pub reason: String,
}

impl BlockedDate {
    /// Whether this block is a full-day exclusion.
    pub fn is_full_day(&self) -> bool {
        self.interval.is_none()
    }

    /// Whether this block rules out the given interval on its date.
    pub fn excludes(&self, interval: &TimeInterval) -> bool {
        match &self.interval {
            None => true,
            Some(blocked) => blocked.overlaps(interval),
        }
    }
}
