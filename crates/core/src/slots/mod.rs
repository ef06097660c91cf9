//! Slot classification and enumeration

pub mod service;

pub use service::SlotAvailabilityEngine;
