//! # Ramils Infra
//!
//! Infrastructure layer: SQLite adapters for the core scheduler ports and
//! the configuration loader.
//!
//! ## Architecture
//! - Implements the `ramils-core` port traits
//! - Blocking SQLite work runs on `tokio::task::spawn_blocking`
//! - All errors are mapped into `ramils_domain::SchedulerError` at this
//!   boundary

pub mod config;
pub mod database;
pub mod errors;

pub use database::{
    DbManager, SqliteAssignmentRepository, SqliteAvailabilityRepository, SqliteBookingRepository,
    SqliteStaffRepository,
};
pub use errors::InfraError;
