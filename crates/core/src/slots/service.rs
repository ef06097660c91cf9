//! Slot availability engine - the single authority consulted before a
//! reservation is accepted
//!
//! Read-mostly: classification never mutates state. Booking creation calls
//! [`SlotAvailabilityEngine::classify`] first and persists separately; the
//! persistence adapter re-checks under a write transaction so concurrent
//! submissions cannot both win the same slot.

use std::sync::Arc;

use chrono::NaiveDate;
use ramils_domain::{DayStatus, Result, SchedulerError, Slot, SlotStatus, TimeInterval};

use crate::availability::AvailabilityCalendar;
use crate::clock::Clock;
use crate::ledger::BookingLedger;

/// Classifies `(date, interval)` candidates against bookings and venue
/// blocks, and enumerates open slots from externally supplied catalogs.
pub struct SlotAvailabilityEngine {
    ledger: Arc<BookingLedger>,
    calendar: Arc<AvailabilityCalendar>,
    clock: Arc<dyn Clock>,
}

impl SlotAvailabilityEngine {
    /// Create a new engine
    pub fn new(
        ledger: Arc<BookingLedger>,
        calendar: Arc<AvailabilityCalendar>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { ledger, calendar, clock }
    }

    /// Classify a candidate interval on a date.
    ///
    /// Past dates are rejected categorically before the ledger is touched.
    /// Venue blocks take precedence over booking conflicts in the reported
    /// status.
    pub async fn classify(&self, date: NaiveDate, interval: &TimeInterval) -> Result<SlotStatus> {
        if date < self.clock.today() {
            return Err(SchedulerError::Validation(format!("date {date} is in the past")));
        }

        let blocks = self.calendar.blocked_on(date).await?;
        if let Some(block) = blocks.iter().find(|b| b.excludes(interval)) {
            return Ok(SlotStatus::Blocked { reason: block.reason.clone() });
        }

        let conflicts = self.ledger.find_conflicts(date, interval, None).await?;
        if let Some(conflict) = conflicts.first() {
            return Ok(SlotStatus::Booked { conflict: conflict.kind.label().to_string() });
        }

        Ok(SlotStatus::Available)
    }

    /// Catalog slots on `date` that are neither booked nor blocked.
    ///
    /// Any overlap disqualifies the whole candidate slot; slots are never
    /// split. Past dates and fully blocked dates yield an empty list.
    pub async fn enumerate_open_slots(
        &self,
        date: NaiveDate,
        catalog: &[Slot],
    ) -> Result<Vec<Slot>> {
        if date < self.clock.today() {
            return Ok(Vec::new());
        }

        let blocks = self.calendar.blocked_on(date).await?;
        if blocks.iter().any(|b| b.is_full_day()) {
            return Ok(Vec::new());
        }

        let mut open = Vec::new();
        for slot in catalog {
            if blocks.iter().any(|b| b.excludes(&slot.interval)) {
                continue;
            }
            if !self.ledger.find_conflicts(date, &slot.interval, None).await?.is_empty() {
                continue;
            }
            open.push(slot.clone());
        }
        Ok(open)
    }

    /// Day-level roll-up for calendar rendering.
    pub async fn classify_date(&self, date: NaiveDate, catalog: &[Slot]) -> Result<DayStatus> {
        let blocks = self.calendar.blocked_on(date).await?;
        if blocks.iter().any(|b| b.is_full_day()) {
            return Ok(DayStatus::Blocked);
        }

        let open = self.enumerate_open_slots(date, catalog).await?;
        Ok(if open.len() == catalog.len() {
            DayStatus::Open
        } else if open.is_empty() {
            DayStatus::Full
        } else {
            DayStatus::Partial
        })
    }
}
