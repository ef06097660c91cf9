//! # Ramils Domain
//!
//! Business domain types and models for the Ramils booking scheduler.
//!
//! This crate contains:
//! - Domain data types (TimeInterval, Booking, AvailabilityRule, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and slot catalogs
//!
//! ## Architecture
//! - No dependencies on other Ramils crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
