//! SQLite-backed implementation of the `AvailabilityRepository` port.
//!
//! Weekly rules are replaced wholesale (delete-then-recreate) inside one
//! transaction so a crash can never leave a staff member with a partial
//! week; query paths fail closed on whatever is actually stored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use ramils_core::availability::ports::AvailabilityRepository;
use ramils_domain::{
    AvailabilityRule, AvailabilityStatus, BlockedDate, Result, SchedulerError, TimeInterval,
};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::booking_repository::parse_date;
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed availability repository.
pub struct SqliteAvailabilityRepository {
    db: Arc<DbManager>,
}

impl SqliteAvailabilityRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepository {
    async fn rules_for_staff(&self, staff_id: &str) -> Result<Vec<AvailabilityRule>> {
        let db = Arc::clone(&self.db);
        let staff_id = staff_id.to_owned();

        task::spawn_blocking(move || -> Result<Vec<AvailabilityRule>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, staff_id, weekday, status, window_from_min, window_to_min
                     FROM availability_rules WHERE staff_id = ? ORDER BY weekday",
                )
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![staff_id], rule_row)
                .map_err(map_sql_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(map_sql_error)?;
            rows.into_iter().map(rule_from_row).collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn rule_for_day(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> Result<Option<AvailabilityRule>> {
        let db = Arc::clone(&self.db);
        let staff_id = staff_id.to_owned();
        let weekday_idx = weekday.num_days_from_monday();

        task::spawn_blocking(move || -> Result<Option<AvailabilityRule>> {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    "SELECT id, staff_id, weekday, status, window_from_min, window_to_min
                     FROM availability_rules WHERE staff_id = ? AND weekday = ?",
                    params![staff_id, weekday_idx],
                    rule_row,
                )
                .optional()
                .map_err(map_sql_error)?;
            row.map(rule_from_row).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn replace_weekly_rules(
        &self,
        staff_id: &str,
        rules: Vec<AvailabilityRule>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let staff_id = staff_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            tx.execute("DELETE FROM availability_rules WHERE staff_id = ?", params![staff_id])
                .map_err(map_sql_error)?;
            for rule in &rules {
                tx.execute(
                    "INSERT INTO availability_rules
                         (id, staff_id, weekday, status, window_from_min, window_to_min)
                     VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        rule.id,
                        rule.staff_id,
                        rule.weekday.num_days_from_monday(),
                        status_to_str(rule.status),
                        rule.window.map(|w| w.from_min),
                        rule.window.map(|w| w.to_min),
                    ],
                )
                .map_err(map_sql_error)?;
            }

            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn add_blocked_date(&self, block: BlockedDate) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO blocked_dates (id, date, interval_from_min, interval_to_min, reason)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    block.id,
                    block.date.to_string(),
                    block.interval.map(|i| i.from_min),
                    block.interval.map(|i| i.to_min),
                    block.reason,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove_blocked_date(&self, block_id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let block_id = block_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("DELETE FROM blocked_dates WHERE id = ?", params![block_id])
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SchedulerError::NotFound(format!("blocked date {block_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn blocked_on(&self, date: NaiveDate) -> Result<Vec<BlockedDate>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<BlockedDate>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, date, interval_from_min, interval_to_min, reason
                     FROM blocked_dates WHERE date = ?",
                )
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![date.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<u16>>(2)?,
                        row.get::<_, Option<u16>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })
                .map_err(map_sql_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(map_sql_error)?;

            rows.into_iter()
                .map(|(id, date, from_min, to_min, reason)| {
                    let interval = match (from_min, to_min) {
                        (Some(from), Some(to)) => Some(TimeInterval::new(from, to)?),
                        _ => None,
                    };
                    Ok(BlockedDate { id, date: parse_date(&date)?, interval, reason })
                })
                .collect()
        })
        .await
        .map_err(map_join_error)?
    }
}

type RuleRow = (String, String, u8, String, Option<u16>, Option<u16>);

fn rule_row(row: &Row<'_>) -> rusqlite::Result<RuleRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
}

fn rule_from_row(row: RuleRow) -> Result<AvailabilityRule> {
    let (id, staff_id, weekday, status, from_min, to_min) = row;
    let window = match (from_min, to_min) {
        (Some(from), Some(to)) => Some(TimeInterval::new(from, to)?),
        _ => None,
    };
    Ok(AvailabilityRule {
        id,
        staff_id,
        weekday: weekday_from_index(weekday)?,
        status: status_from_str(&status)?,
        window,
    })
}

fn status_to_str(status: AvailabilityStatus) -> &'static str {
    match status {
        AvailabilityStatus::Available => "available",
        AvailabilityStatus::Blocked => "blocked",
    }
}

fn status_from_str(input: &str) -> Result<AvailabilityStatus> {
    match input {
        "available" => Ok(AvailabilityStatus::Available),
        "blocked" => Ok(AvailabilityStatus::Blocked),
        other => Err(SchedulerError::Database(format!("unknown availability status {other:?}"))),
    }
}

/// Weekday stored as 0 = Monday .. 6 = Sunday.
fn weekday_from_index(index: u8) -> Result<Weekday> {
    use chrono::Weekday::*;
    Ok(match index {
        0 => Mon,
        1 => Tue,
        2 => Wed,
        3 => Thu,
        4 => Fri,
        5 => Sat,
        6 => Sun,
        other => {
            return Err(SchedulerError::Database(format!("invalid weekday index {other}")));
        }
    })
}
