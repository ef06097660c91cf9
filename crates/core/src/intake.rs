//! Booking intake orchestration
//!
//! One synchronous decision per submission: validate, classify, persist,
//! auto-assign. Notification dispatch consumes the returned outcome and is
//! external to this crate.

use std::sync::Arc;

use ramils_domain::{
    Booking, BookingRequest, Result, SchedulerError, SlotStatus, StaffAssignment,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::assignment::StaffAutoAssigner;
use crate::clock::Clock;
use crate::ledger::ports::BookingRepository;
use crate::slots::SlotAvailabilityEngine;

/// Result of an accepted booking submission, handed to notification
/// dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub assignments: Vec<StaffAssignment>,
}

/// Drives a booking submission end to end.
pub struct BookingIntake {
    engine: Arc<SlotAvailabilityEngine>,
    repository: Arc<dyn BookingRepository>,
    assigner: Arc<StaffAutoAssigner>,
    clock: Arc<dyn Clock>,
}

impl BookingIntake {
    /// Create a new intake service
    pub fn new(
        engine: Arc<SlotAvailabilityEngine>,
        repository: Arc<dyn BookingRepository>,
        assigner: Arc<StaffAutoAssigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { engine, repository, assigner, clock }
    }

    /// Validate and accept a reservation, or reject it with a user-facing
    /// error. A lost race at the persistence layer surfaces with the same
    /// message as an ordinary slot rejection.
    pub async fn request_booking(&self, request: BookingRequest) -> Result<BookingOutcome> {
        self.validate(&request)?;

        match self.engine.classify(request.date, &request.interval).await? {
            SlotStatus::Available => {}
            SlotStatus::Booked { conflict } => {
                return Err(SchedulerError::SlotUnavailable(format!(
                    "{} {} conflicts with an existing {} booking",
                    request.date, request.interval, conflict
                )));
            }
            SlotStatus::Blocked { reason } => {
                return Err(SchedulerError::SlotUnavailable(format!(
                    "{} {} falls on a blocked date ({})",
                    request.date, request.interval, reason
                )));
            }
        }

        let booking = match self
            .repository
            .create_booking(request, self.clock.today())
            .await
        {
            Ok(booking) => booking,
            Err(SchedulerError::RaceLost(detail)) => {
                warn!(%detail, "booking lost the slot between classify and insert");
                return Err(SchedulerError::RaceLost(detail));
            }
            Err(other) => return Err(other),
        };

        // Auto-assignment never blocks an accepted booking
        let assignments = match self.assigner.assign(&booking).await {
            Ok(assignments) => assignments,
            Err(err) => {
                error!(booking_id = %booking.id, error = %err, "staff auto-assignment failed");
                Vec::new()
            }
        };

        info!(
            booking_id = %booking.id,
            reference = %booking.reference,
            kind = booking.kind.label(),
            assigned = assignments.len(),
            "booking accepted"
        );
        Ok(BookingOutcome { booking, assignments })
    }

    fn validate(&self, request: &BookingRequest) -> Result<()> {
        if request.customer_name.trim().is_empty() {
            return Err(SchedulerError::Validation("customer name is required".into()));
        }
        if let Some(return_date) = request.return_date {
            if return_date < request.date {
                return Err(SchedulerError::Validation(format!(
                    "return date {} precedes booking date {}",
                    return_date, request.date
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};
    use ramils_domain::{
        all_weekdays, BookingKind, BookingStatus, DayScheduleEntry, TimeInterval, WeekSchedule,
    };

    use super::*;
    use crate::assignment::service::tests::{FakeAssignmentRepo, FakeStaffRepo};
    use crate::assignment::StaffDirectory;
    use crate::availability::service::tests::empty_availability;
    use crate::availability::AvailabilityCalendar;
    use crate::clock::FixedClock;
    use crate::ledger::service::tests::FakeBookingRepo;
    use crate::ledger::BookingLedger;

    struct Harness {
        intake: BookingIntake,
        directory: StaffDirectory,
        calendar: Arc<AvailabilityCalendar>,
    }

    // 2025-08-15 is a Friday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    fn harness(today: NaiveDate) -> Harness {
        let (calendar, _) = empty_availability();
        let calendar = Arc::new(calendar);
        let bookings = Arc::new(FakeBookingRepo::default());
        let staff = Arc::new(FakeStaffRepo::default());
        let assignments = Arc::new(FakeAssignmentRepo::default());
        let clock = Arc::new(FixedClock(today));

        let ledger = Arc::new(BookingLedger::new(bookings.clone()));
        let engine = Arc::new(SlotAvailabilityEngine::new(
            ledger,
            calendar.clone(),
            clock.clone(),
        ));
        let assigner = Arc::new(StaffAutoAssigner::new(
            staff.clone(),
            assignments.clone(),
            calendar.clone(),
        ));
        let directory = StaffDirectory::new(staff, assignments, calendar.clone());

        Harness {
            intake: BookingIntake::new(engine, bookings, assigner, clock),
            directory,
            calendar,
        }
    }

    fn request(kind: BookingKind, date: NaiveDate, from_h: u16, to_h: u16) -> BookingRequest {
        BookingRequest {
            kind,
            customer_name: "Dela Cruz".into(),
            date,
            interval: TimeInterval::from_hm(from_h, 0, to_h, 0).unwrap(),
            return_date: None,
        }
    }

    fn friday_window(from_h: u16, to_h: u16) -> WeekSchedule {
        let entries = all_weekdays()
            .iter()
            .map(|&weekday| {
                if weekday == Weekday::Fri {
                    DayScheduleEntry::available(
                        weekday,
                        TimeInterval::from_hm(from_h, 0, to_h, 0).unwrap(),
                    )
                } else {
                    DayScheduleEntry::blocked(weekday)
                }
            })
            .collect();
        WeekSchedule::new(entries).unwrap()
    }

    #[tokio::test]
    async fn accepted_booking_gets_reference_and_assignments() {
        let h = harness(friday());
        let full_cover = h.directory.create_staff("Alma", "Coordinator").await.unwrap();
        let partial = h.directory.create_staff("Ben", "Waiter").await.unwrap();
        h.calendar.set_weekly_schedule(&full_cover.id, &friday_window(7, 20)).await.unwrap();
        h.calendar.set_weekly_schedule(&partial.id, &friday_window(7, 12)).await.unwrap();

        let outcome = h
            .intake
            .request_booking(request(BookingKind::Event, friday(), 7, 20))
            .await
            .unwrap();

        assert_eq!(outcome.booking.reference, "RAMILS-20250815-0001");
        assert_eq!(outcome.booking.status, BookingStatus::Pending);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].staff_id, full_cover.id);
    }

    #[tokio::test]
    async fn second_booking_same_day_increments_the_sequence() {
        let h = harness(friday());
        let first = h
            .intake
            .request_booking(request(BookingKind::Event, friday(), 7, 10))
            .await
            .unwrap();
        let second = h
            .intake
            .request_booking(request(BookingKind::Service, friday(), 11, 14))
            .await
            .unwrap();

        assert_eq!(first.booking.reference, "RAMILS-20250815-0001");
        assert_eq!(second.booking.reference, "RAMILS-20250815-0002");
    }

    #[tokio::test]
    async fn conflicting_request_is_rejected_as_slot_unavailable() {
        let h = harness(friday());
        h.intake
            .request_booking(request(BookingKind::Event, friday(), 9, 12))
            .await
            .unwrap();

        let err = h
            .intake
            .request_booking(request(BookingKind::Service, friday(), 10, 11))
            .await
            .unwrap_err();
        assert!(err.is_slot_rejection());
    }

    #[tokio::test]
    async fn blocked_date_rejection_names_the_reason() {
        let h = harness(friday());
        h.calendar.block_date(friday(), None, "maintenance").await.unwrap();

        let err = h
            .intake
            .request_booking(request(BookingKind::Event, friday(), 9, 12))
            .await
            .unwrap_err();
        match err {
            SchedulerError::SlotUnavailable(message) => {
                assert!(message.contains("maintenance"))
            }
            other => panic!("expected slot rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn past_date_is_a_validation_error() {
        let h = harness(friday());
        let yesterday = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        let err = h
            .intake
            .request_booking(request(BookingKind::Event, yesterday, 9, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
    }

    #[tokio::test]
    async fn return_date_before_booking_date_is_rejected() {
        let h = harness(friday());
        let mut req = request(BookingKind::Service, friday(), 9, 12);
        req.return_date = Some(NaiveDate::from_ymd_opt(2025, 8, 14).unwrap());
        let err = h.intake.request_booking(req).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_staff_still_accepts_the_booking() {
        let h = harness(friday());
        let outcome = h
            .intake
            .request_booking(request(BookingKind::Event, friday(), 9, 12))
            .await
            .unwrap();
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn appointment_starts_reserved_with_no_assignments() {
        let h = harness(friday());
        let staff = h.directory.create_staff("Alma", "Therapist").await.unwrap();
        h.calendar.set_weekly_schedule(&staff.id, &friday_window(7, 20)).await.unwrap();

        let outcome = h
            .intake
            .request_booking(request(BookingKind::Appointment, friday(), 9, 10))
            .await
            .unwrap();
        assert_eq!(outcome.booking.status, BookingStatus::Reserved);
        assert!(outcome.assignments.is_empty());
    }
}
