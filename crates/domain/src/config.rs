//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POOL_SIZE, DEFAULT_REFERENCE_PREFIX};

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Booking-intake configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Prefix for generated reference numbers (`PREFIX-YYYYMMDD-NNNN`)
    pub reference_prefix: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "ramils.db".to_string(), pool_size: DEFAULT_POOL_SIZE },
            booking: BookingConfig { reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string() },
        }
    }
}
