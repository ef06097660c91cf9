//! Conflict queries over the venue's single shared calendar

pub mod ports;
pub mod service;

pub use service::BookingLedger;
