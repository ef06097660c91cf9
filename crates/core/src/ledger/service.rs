//! Booking ledger service - conflict detection across booking kinds

use std::sync::Arc;

use chrono::NaiveDate;
use ramils_domain::{
    BlockedDate, Booking, BookingStatus, CalendarEntry, Result, SchedulerError, Slot,
    TimeInterval,
};
use tracing::info;

use super::ports::BookingRepository;

/// Query view over committed reservations.
///
/// An event booking and a service booking on the same date/interval conflict
/// with each other: the venue has one schedule. Appointments historically
/// occupy a separate physical resource but take part in the shared
/// "is this slot physically free" check all the same.
pub struct BookingLedger {
    repository: Arc<dyn BookingRepository>,
}

impl BookingLedger {
    /// Create a new ledger over the booking repository
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    /// Every active booking on `date` whose interval overlaps the requested
    /// one, any kind. `exclude` skips one booking id (reschedule checks).
    pub async fn find_conflicts(
        &self,
        date: NaiveDate,
        interval: &TimeInterval,
        exclude: Option<&str>,
    ) -> Result<Vec<CalendarEntry>> {
        let entries = self.repository.entries_on(date).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| {
                entry.interval.overlaps(interval)
                    && exclude.map(|id| entry.booking_id != id).unwrap_or(true)
            })
            .collect())
    }

    /// Whether every candidate slot on `date` is taken by a booking or a
    /// venue block. Used to disable a calendar day entirely.
    pub async fn is_date_fully_booked(
        &self,
        date: NaiveDate,
        catalog: &[Slot],
        blocks: &[BlockedDate],
    ) -> Result<bool> {
        if catalog.is_empty() {
            return Ok(false);
        }
        if blocks.iter().any(BlockedDate::is_full_day) {
            return Ok(true);
        }
        let entries = self.repository.entries_on(date).await?;
        Ok(catalog.iter().all(|slot| {
            entries.iter().any(|entry| entry.interval.overlaps(&slot.interval))
                || blocks.iter().any(|block| block.excludes(&slot.interval))
        }))
    }

    /// Fetch one booking, erroring when it does not exist
    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.repository
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| SchedulerError::NotFound(format!("booking {booking_id}")))
    }

    /// Move a booking through its kind-specific lifecycle
    pub async fn transition(&self, booking_id: &str, next: BookingStatus) -> Result<Booking> {
        let mut booking = self.get_booking(booking_id).await?;
        booking.transition(next)?;
        self.repository.update_status(booking_id, next).await?;
        info!(booking_id, reference = %booking.reference, status = ?next, "booking status changed");
        Ok(booking)
    }

    /// Soft-delete a booking, freeing its slot
    pub async fn soft_delete(&self, booking_id: &str) -> Result<()> {
        self.repository.soft_delete(booking_id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use ramils_domain::{format_reference, BookingKind, BookingRequest};
    use uuid::Uuid;

    use super::*;

    /// In-memory booking store used by ledger, engine and intake tests.
    #[derive(Default)]
    pub(crate) struct FakeBookingRepo {
        pub bookings: Mutex<HashMap<String, Booking>>,
        pub sequences: Mutex<HashMap<NaiveDate, u32>>,
    }

    impl FakeBookingRepo {
        pub fn with_booking(self, booking: Booking) -> Self {
            self.bookings.lock().unwrap().insert(booking.id.clone(), booking);
            self
        }
    }

    #[async_trait]
    impl BookingRepository for FakeBookingRepo {
        async fn entries_on(&self, date: NaiveDate) -> Result<Vec<CalendarEntry>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.date == date && b.occupies_calendar())
                .map(Booking::calendar_entry)
                .collect())
        }

        async fn create_booking(
            &self,
            request: BookingRequest,
            created_on: NaiveDate,
        ) -> Result<Booking> {
            // Mirror the adapter's serialized re-check
            let conflict = self
                .bookings
                .lock()
                .unwrap()
                .values()
                .any(|b| {
                    b.date == request.date
                        && b.occupies_calendar()
                        && b.interval.overlaps(&request.interval)
                });
            if conflict {
                return Err(SchedulerError::RaceLost("slot taken during insert".into()));
            }

            let sequence = {
                let mut sequences = self.sequences.lock().unwrap();
                let seq = sequences.entry(created_on).or_insert(0);
                *seq += 1;
                *seq
            };

            let booking = Booking {
                id: Uuid::new_v4().to_string(),
                kind: request.kind,
                reference: format_reference("RAMILS", created_on, sequence),
                customer_name: request.customer_name,
                date: request.date,
                interval: request.interval,
                return_date: request.return_date,
                status: BookingStatus::initial(request.kind),
                deleted: false,
                created_at: 0,
            };
            self.bookings.lock().unwrap().insert(booking.id.clone(), booking.clone());
            Ok(booking)
        }

        async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
            Ok(self.bookings.lock().unwrap().get(booking_id).cloned())
        }

        async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<()> {
            let mut bookings = self.bookings.lock().unwrap();
            let booking = bookings
                .get_mut(booking_id)
                .ok_or_else(|| SchedulerError::NotFound(booking_id.to_string()))?;
            booking.status = status;
            Ok(())
        }

        async fn soft_delete(&self, booking_id: &str) -> Result<()> {
            let mut bookings = self.bookings.lock().unwrap();
            let booking = bookings
                .get_mut(booking_id)
                .ok_or_else(|| SchedulerError::NotFound(booking_id.to_string()))?;
            booking.deleted = true;
            Ok(())
        }
    }

    pub(crate) fn seeded_booking(
        id: &str,
        kind: BookingKind,
        date: NaiveDate,
        from_h: u16,
        to_h: u16,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: id.to_string(),
            kind,
            reference: format!("RAMILS-{}-0001", date.format("%Y%m%d")),
            customer_name: "Reyes".into(),
            date,
            interval: TimeInterval::from_hm(from_h, 0, to_h, 0).unwrap(),
            return_date: None,
            status,
            deleted: false,
            created_at: 0,
        }
    }

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn overlapping_subset_counts_as_conflict() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            9,
            12,
            BookingStatus::Confirmed,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        let subset = TimeInterval::from_hm(10, 0, 11, 0).unwrap();
        let conflicts = ledger.find_conflicts(june_first(), &subset, None).await.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].booking_id, "b1");
    }

    #[tokio::test]
    async fn touching_boundary_is_not_a_conflict() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            9,
            12,
            BookingStatus::Confirmed,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        let adjacent = TimeInterval::from_hm(12, 0, 14, 0).unwrap();
        assert!(ledger.find_conflicts(june_first(), &adjacent, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn kinds_conflict_with_each_other() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "svc",
            BookingKind::Service,
            june_first(),
            9,
            12,
            BookingStatus::Confirmed,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        // An event request hits the service booking: one venue, one schedule
        let interval = TimeInterval::from_hm(11, 0, 13, 0).unwrap();
        let conflicts = ledger.find_conflicts(june_first(), &interval, None).await.unwrap();
        assert_eq!(conflicts[0].kind, BookingKind::Service);
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_conflict() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            9,
            12,
            BookingStatus::Cancelled,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        let interval = TimeInterval::from_hm(10, 0, 11, 0).unwrap();
        assert!(ledger.find_conflicts(june_first(), &interval, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exclude_skips_the_booking_being_rescheduled() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            9,
            12,
            BookingStatus::Confirmed,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        let interval = TimeInterval::from_hm(10, 0, 11, 0).unwrap();
        assert!(ledger
            .find_conflicts(june_first(), &interval, Some("b1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn full_day_block_makes_the_date_fully_booked() {
        let ledger = BookingLedger::new(Arc::new(FakeBookingRepo::default()));
        let blocks = vec![BlockedDate {
            id: "blk".into(),
            date: june_first(),
            interval: None,
            reason: "holiday".into(),
        }];
        let catalog = ramils_domain::constants::half_day_catalog();
        assert!(ledger.is_date_fully_booked(june_first(), &catalog, &blocks).await.unwrap());
    }

    #[tokio::test]
    async fn date_with_one_open_slot_is_not_fully_booked() {
        // AM half taken, PM half open
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            7,
            12,
            BookingStatus::Confirmed,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));
        let catalog = ramils_domain::constants::half_day_catalog();
        assert!(!ledger.is_date_fully_booked(june_first(), &catalog, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn transition_enforces_lifecycle() {
        let repo = FakeBookingRepo::default().with_booking(seeded_booking(
            "b1",
            BookingKind::Event,
            june_first(),
            9,
            12,
            BookingStatus::Pending,
        ));
        let ledger = BookingLedger::new(Arc::new(repo));

        ledger.transition("b1", BookingStatus::Confirmed).await.unwrap();
        let err = ledger.transition("b1", BookingStatus::Pending).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
    }
}
