//! Per-staff weekly availability and venue-wide blocked dates

pub mod ports;
pub mod service;

pub use service::AvailabilityCalendar;
