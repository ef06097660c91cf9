//! Staff auto-assignment for newly accepted bookings

pub mod ports;
pub mod service;

pub use service::{StaffAutoAssigner, StaffDirectory};
