//! Candidate slot catalogs and classification results

use serde::{Deserialize, Serialize};

use super::time::TimeInterval;

/// A named candidate time interval within a day, drawn from an externally
/// supplied catalog (e.g. "Full-Day Event"). Catalogs differ per booking
/// kind and are passed into the engine, never hard-coded there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub interval: TimeInterval,
}

impl Slot {
    pub fn new(name: impl Into<String>, interval: TimeInterval) -> Self {
        Self { name: name.into(), interval }
    }
}

/// Classification of a single `(date, interval)` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Available,
    /// Conflicts with an active booking; carries the conflicting booking's
    /// kind label when determinable.
    Booked { conflict: String },
    /// Overlaps a venue-wide blocked date; carries the admin-entered reason.
    Blocked { reason: String },
}

impl SlotStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Day-level roll-up across a slot catalog, used to color-code date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    /// Every catalog slot is open
    Open,
    /// Some catalog slots are open, some are not
    Partial,
    /// Every catalog slot conflicts with a booking or block
    Full,
    /// A full-day venue block is in force
    Blocked,
}
