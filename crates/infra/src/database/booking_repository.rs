//! SQLite-backed implementation of the `BookingRepository` port.
//!
//! Booking creation is the one write path that must be serialized against
//! concurrent submissions: the insert runs inside an `IMMEDIATE` transaction
//! that re-checks conflicts and bumps the per-day reference sequence before
//! writing the row. A competing insert that already took the slot surfaces
//! as `SchedulerError::RaceLost`.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use ramils_core::ledger::ports::BookingRepository;
use ramils_domain::{
    format_reference, Booking, BookingKind, BookingRequest, BookingStatus, CalendarEntry, Result,
    SchedulerError, TimeInterval,
};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

const BOOKING_COLUMNS: &str = "id, kind, reference, customer_name, date, time_from_min, \
     time_to_min, return_date, status, deleted, created_at";

/// SQLite-backed booking repository.
pub struct SqliteBookingRepository {
    db: Arc<DbManager>,
    reference_prefix: String,
}

impl SqliteBookingRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>, reference_prefix: impl Into<String>) -> Self {
        Self { db, reference_prefix: reference_prefix.into() }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn entries_on(&self, date: NaiveDate) -> Result<Vec<CalendarEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<CalendarEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, kind, date, time_from_min, time_to_min, reference
                     FROM bookings
                     WHERE date = ? AND deleted = 0 AND status != 'cancelled'",
                )
                .map_err(map_sql_error)?;
            let entries = stmt
                .query_map(params![date.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, u16>(3)?,
                        row.get::<_, u16>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                })
                .map_err(map_sql_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(map_sql_error)?;

            entries
                .into_iter()
                .map(|(id, kind, date, from_min, to_min, reference)| {
                    Ok(CalendarEntry {
                        booking_id: id,
                        kind: kind_from_str(&kind)?,
                        date: parse_date(&date)?,
                        interval: TimeInterval::new(from_min, to_min)?,
                        reference,
                    })
                })
                .collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create_booking(
        &self,
        request: BookingRequest,
        created_on: NaiveDate,
    ) -> Result<Booking> {
        let db = Arc::clone(&self.db);
        let prefix = self.reference_prefix.clone();

        task::spawn_blocking(move || -> Result<Booking> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            // Serialized re-check: the caller's classify() ran outside any
            // lock, so a competing submission may have taken the slot since.
            let conflicts: i64 = tx
                .query_row(
                    "SELECT COUNT(*) FROM bookings
                     WHERE date = ? AND deleted = 0 AND status != 'cancelled'
                       AND time_from_min < ? AND ? < time_to_min",
                    params![
                        request.date.to_string(),
                        request.interval.to_min,
                        request.interval.from_min
                    ],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;
            if conflicts > 0 {
                return Err(SchedulerError::RaceLost(format!(
                    "slot {} {} was taken by a concurrent booking",
                    request.date, request.interval
                )));
            }

            let day_key = created_on.to_string();
            tx.execute(
                "INSERT INTO booking_sequences (day, last_seq) VALUES (?, 1)
                 ON CONFLICT (day) DO UPDATE SET last_seq = last_seq + 1",
                params![day_key],
            )
            .map_err(map_sql_error)?;
            let sequence: u32 = tx
                .query_row(
                    "SELECT last_seq FROM booking_sequences WHERE day = ?",
                    params![day_key],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;

            let booking = Booking {
                id: uuid::Uuid::new_v4().to_string(),
                kind: request.kind,
                reference: format_reference(&prefix, created_on, sequence),
                customer_name: request.customer_name,
                date: request.date,
                interval: request.interval,
                return_date: request.return_date,
                status: BookingStatus::initial(request.kind),
                deleted: false,
                created_at: chrono::Utc::now().timestamp(),
            };

            tx.execute(
                "INSERT INTO bookings (id, kind, reference, customer_name, date,
                     time_from_min, time_to_min, return_date, status, deleted, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
                params![
                    booking.id,
                    booking.kind.label(),
                    booking.reference,
                    booking.customer_name,
                    booking.date.to_string(),
                    booking.interval.from_min,
                    booking.interval.to_min,
                    booking.return_date.map(|d| d.to_string()),
                    status_to_str(booking.status),
                    booking.created_at,
                ],
            )
            .map_err(map_sql_error)?;

            tx.commit().map_err(map_sql_error)?;
            Ok(booking)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
        let db = Arc::clone(&self.db);
        let booking_id = booking_id.to_owned();

        task::spawn_blocking(move || -> Result<Option<Booking>> {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"),
                    params![booking_id],
                    booking_row_tuple,
                )
                .optional()
                .map_err(map_sql_error)?;
            row.map(booking_from_tuple).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<()> {
        let db = Arc::clone(&self.db);
        let booking_id = booking_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE bookings SET status = ? WHERE id = ?",
                    params![status_to_str(status), booking_id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SchedulerError::NotFound(format!("booking {booking_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, booking_id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let booking_id = booking_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("UPDATE bookings SET deleted = 1 WHERE id = ?", params![booking_id])
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SchedulerError::NotFound(format!("booking {booking_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

type BookingTuple =
    (String, String, String, String, String, u16, u16, Option<String>, String, bool, i64);

fn booking_row_tuple(row: &Row<'_>) -> rusqlite::Result<BookingTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn booking_from_tuple(tuple: BookingTuple) -> Result<Booking> {
    let (id, kind, reference, customer_name, date, from_min, to_min, return_date, status, deleted, created_at) =
        tuple;
    Ok(Booking {
        id,
        kind: kind_from_str(&kind)?,
        reference,
        customer_name,
        date: parse_date(&date)?,
        interval: TimeInterval::new(from_min, to_min)?,
        return_date: return_date.as_deref().map(parse_date).transpose()?,
        status: status_from_str(&status)?,
        deleted,
        created_at,
    })
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::from_str(input)
        .map_err(|e| SchedulerError::Database(format!("invalid stored date {input:?}: {e}")))
}

pub(crate) fn kind_from_str(input: &str) -> Result<BookingKind> {
    match input {
        "event" => Ok(BookingKind::Event),
        "service" => Ok(BookingKind::Service),
        "appointment" => Ok(BookingKind::Appointment),
        other => Err(SchedulerError::Database(format!("unknown booking kind {other:?}"))),
    }
}

pub(crate) fn status_to_str(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Reserved => "reserved",
        BookingStatus::Completed => "completed",
        BookingStatus::Cancelled => "cancelled",
    }
}

pub(crate) fn status_from_str(input: &str) -> Result<BookingStatus> {
    match input {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "reserved" => Ok(BookingStatus::Reserved),
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(SchedulerError::Database(format!("unknown booking status {other:?}"))),
    }
}
