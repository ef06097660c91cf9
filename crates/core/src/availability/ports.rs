//! Port interfaces for availability data
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use ramils_domain::{AvailabilityRule, BlockedDate, Result};

/// Persistence for weekly availability rules and venue blocked dates.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Get all weekly rules for one staff member
    async fn rules_for_staff(&self, staff_id: &str) -> Result<Vec<AvailabilityRule>>;

    /// Get the single rule for one staff member on one weekday
    async fn rule_for_day(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> Result<Option<AvailabilityRule>>;

    /// Atomically replace all weekly rules for one staff member.
    /// Delete-then-recreate in a single transaction; a crash must never
    /// leave a partial week behind.
    async fn replace_weekly_rules(
        &self,
        staff_id: &str,
        rules: Vec<AvailabilityRule>,
    ) -> Result<()>;

    /// Record a venue-wide blocked date
    async fn add_blocked_date(&self, block: BlockedDate) -> Result<()>;

    /// Remove a blocked date by id
    async fn remove_blocked_date(&self, block_id: &str) -> Result<()>;

    /// All blocks in force on the given date
    async fn blocked_on(&self, date: NaiveDate) -> Result<Vec<BlockedDate>>;
}
