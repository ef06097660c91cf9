//! # Ramils Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The scheduler services (availability calendar, booking ledger, slot
//!   engine, staff auto-assigner, booking intake)
//! - Port/adapter interfaces (traits) implemented by `ramils-infra`
//!
//! ## Architecture Principles
//! - Only depends on `ramils-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod assignment;
pub mod availability;
pub mod clock;
pub mod intake;
pub mod ledger;
pub mod slots;

// Re-export specific items to avoid ambiguity
pub use assignment::ports::{AssignmentRepository, StaffRepository};
pub use assignment::{StaffAutoAssigner, StaffDirectory};
pub use availability::ports::AvailabilityRepository;
pub use availability::AvailabilityCalendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use intake::{BookingIntake, BookingOutcome};
pub use ledger::ports::BookingRepository;
pub use ledger::BookingLedger;
pub use slots::SlotAvailabilityEngine;
