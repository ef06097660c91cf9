//! Booking records and the normalized calendar projection
//!
//! Three booking kinds share the venue's single calendar. They are modeled
//! as one record type tagged with [`BookingKind`] rather than duck-typed
//! structs with differently named date fields; the ledger consumes the
//! [`CalendarEntry`] projection and never looks at kind-specific data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::TimeInterval;
use crate::errors::{Result, SchedulerError};

/// The three reservation kinds competing for the venue calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Event,
    Service,
    Appointment,
}

impl BookingKind {
    /// Stable label used in references, assignment tags and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Service => "service",
            Self::Appointment => "appointment",
        }
    }

    /// Whether the auto-assigner runs for this kind. Appointments are not
    /// staff-assigned in the current design.
    pub fn staff_assignable(&self) -> bool {
        !matches!(self, Self::Appointment)
    }
}

/// Kind-specific booking lifecycle.
///
/// Event/service: `Pending → Confirmed → Completed`, with `Cancelled`
/// absorbing. Appointments: `Reserved → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Reserved,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Initial status for a freshly accepted booking of the given kind.
    pub fn initial(kind: BookingKind) -> Self {
        match kind {
            BookingKind::Appointment => Self::Reserved,
            _ => Self::Pending,
        }
    }

    /// Active statuses occupy the calendar for conflict purposes.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Validate a lifecycle transition for the given kind.
    pub fn can_transition(self, kind: BookingKind, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match kind {
            BookingKind::Appointment => matches!((self, next), (Reserved, Completed)),
            _ => matches!(
                (self, next),
                (Pending, Confirmed)
                    | (Confirmed, Completed)
                    | (Pending, Cancelled)
                    | (Confirmed, Cancelled)
            ),
        }
    }
}

/// A committed reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub kind: BookingKind,
    /// `PREFIX-YYYYMMDD-NNNN`, sequence scoped to the creation day
    pub reference: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    /// Multi-day service rentals record the return date; it is not
    /// scheduled against the calendar.
    pub return_date: Option<NaiveDate>,
    pub status: BookingStatus,
    pub deleted: bool,
    pub created_at: i64,
}

impl Booking {
    /// Whether this booking occupies the calendar.
    pub fn occupies_calendar(&self) -> bool {
        !self.deleted && self.status.is_active()
    }

    /// Apply a lifecycle transition, rejecting moves the kind does not allow.
    pub fn transition(&mut self, next: BookingStatus) -> Result<()> {
        if !self.status.can_transition(self.kind, next) {
            return Err(SchedulerError::Validation(format!(
                "{} booking cannot move {:?} -> {:?}",
                self.kind.label(),
                self.status,
                next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Normalized projection consumed by the booking ledger.
    pub fn calendar_entry(&self) -> CalendarEntry {
        CalendarEntry {
            booking_id: self.id.clone(),
            kind: self.kind,
            date: self.date,
            interval: self.interval,
            reference: self.reference.clone(),
        }
    }
}

/// Intake payload for a new reservation, before validation/acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub kind: BookingKind,
    pub customer_name: String,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    pub return_date: Option<NaiveDate>,
}

/// The `{date, interval, kind}` projection of a booking: the only view the
/// conflict machinery sees, regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub booking_id: String,
    pub kind: BookingKind,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    pub reference: String,
}

/// Format a booking reference: `PREFIX-YYYYMMDD-NNNN`, four-digit
/// zero-padded sequence that resets each creation day.
pub fn format_reference(prefix: &str, created_on: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, created_on.format("%Y%m%d"), sequence)
}
