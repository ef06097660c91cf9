//! Availability calendar service - core business logic

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use ramils_domain::{
    AvailabilityRule, BlockedDate, Result, TimeInterval, WeekSchedule,
};
use tracing::info;
use uuid::Uuid;

use super::ports::AvailabilityRepository;

/// Weekly recurring availability template plus venue date exceptions.
///
/// Staff are governed solely by their weekly template; the venue has no
/// template, only [`BlockedDate`] exceptions.
pub struct AvailabilityCalendar {
    repository: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityCalendar {
    /// Create a new calendar service
    pub fn new(repository: Arc<dyn AvailabilityRepository>) -> Self {
        Self { repository }
    }

    /// Whether the staff member's window on `date`'s weekday fully covers
    /// the requested interval.
    ///
    /// Partial overlap is not sufficient for staff eligibility, and a
    /// missing weekday rule counts as unavailable (fail closed).
    pub async fn is_staff_available(
        &self,
        staff_id: &str,
        date: NaiveDate,
        interval: &TimeInterval,
    ) -> Result<bool> {
        let rule = self.repository.rule_for_day(staff_id, date.weekday()).await?;
        Ok(rule.map(|r| r.covers(interval)).unwrap_or(false))
    }

    /// Replace a staff member's whole week. The schedule payload has been
    /// validated to carry exactly one entry per weekday; days marked
    /// available without hours pick up the default working window.
    pub async fn set_weekly_schedule(
        &self,
        staff_id: &str,
        schedule: &WeekSchedule,
    ) -> Result<()> {
        let rules: Vec<AvailabilityRule> = schedule
            .entries()
            .iter()
            .map(|entry| AvailabilityRule {
                id: Uuid::new_v4().to_string(),
                staff_id: staff_id.to_string(),
                weekday: entry.weekday,
                status: entry.status,
                window: entry.effective_window(),
            })
            .collect();

        self.repository.replace_weekly_rules(staff_id, rules).await?;
        info!(staff_id, "weekly schedule replaced");
        Ok(())
    }

    /// Seed the default week (every day 07:00-20:00) for a staff record
    /// created without explicit hours.
    pub async fn seed_default_week(&self, staff_id: &str) -> Result<()> {
        self.set_weekly_schedule(staff_id, &WeekSchedule::default_week()).await
    }

    /// Get all weekly rules for one staff member
    pub async fn weekly_schedule(&self, staff_id: &str) -> Result<Vec<AvailabilityRule>> {
        self.repository.rules_for_staff(staff_id).await
    }

    /// Record a venue-wide block; `interval = None` blocks the whole date.
    pub async fn block_date(
        &self,
        date: NaiveDate,
        interval: Option<TimeInterval>,
        reason: impl Into<String>,
    ) -> Result<BlockedDate> {
        let block = BlockedDate {
            id: Uuid::new_v4().to_string(),
            date,
            interval,
            reason: reason.into(),
        };
        self.repository.add_blocked_date(block.clone()).await?;
        info!(%date, full_day = block.is_full_day(), "venue date blocked");
        Ok(block)
    }

    /// Remove a venue block
    pub async fn unblock_date(&self, block_id: &str) -> Result<()> {
        self.repository.remove_blocked_date(block_id).await
    }

    /// All venue blocks in force on the given date
    pub async fn blocked_on(&self, date: NaiveDate) -> Result<Vec<BlockedDate>> {
        self.repository.blocked_on(date).await
    }
}
