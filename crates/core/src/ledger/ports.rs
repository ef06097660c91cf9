//! Port interfaces for booking persistence

use async_trait::async_trait;
use chrono::NaiveDate;
use ramils_domain::{Booking, BookingRequest, BookingStatus, CalendarEntry, Result};

/// Persistence for the three booking kinds.
///
/// The ledger only ever sees the normalized [`CalendarEntry`] projection;
/// kind-specific payloads stay behind this port.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Calendar entries of all active bookings on the given date,
    /// regardless of kind.
    async fn entries_on(&self, date: NaiveDate) -> Result<Vec<CalendarEntry>>;

    /// Persist a new booking, allocating its reference number from the
    /// per-day sequence.
    ///
    /// Implementations must serialize the conflict re-check, the sequence
    /// bump and the insert (one transaction), and return
    /// `SchedulerError::RaceLost` when a competing insert took the slot
    /// after the caller's availability check.
    async fn create_booking(
        &self,
        request: BookingRequest,
        created_on: NaiveDate,
    ) -> Result<Booking>;

    /// Fetch one booking by id
    async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>>;

    /// Persist a status change
    async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<()>;

    /// Soft-delete a booking, freeing its slot
    async fn soft_delete(&self, booking_id: &str) -> Result<()>;
}
