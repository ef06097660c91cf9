//! Error types used throughout the scheduler

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Ramils scheduler
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SchedulerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    /// A competing request won the slot between the availability check and
    /// the insert. Callers surface this with the same user-facing message as
    /// [`SchedulerError::SlotUnavailable`].
    #[error("Slot unavailable: {0}")]
    RaceLost(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchedulerError {
    /// Whether the error represents a slot rejection (including a lost race).
    pub fn is_slot_rejection(&self) -> bool {
        matches!(self, Self::SlotUnavailable(_) | Self::RaceLost(_))
    }
}

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
