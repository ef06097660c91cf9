//! Domain constants and predefined slot catalogs
//!
//! Catalogs are externally configured inputs to the slot engine; the
//! constructors here are the venue's stock configurations, not engine
//! internals. Intervals in catalogs are infallible by construction, so the
//! constructors panic only on a programming error in this file.

use crate::types::{Slot, TimeInterval};

/// Default working day start, minutes since midnight (07:00)
pub const DEFAULT_DAY_START_MIN: u16 = 7 * 60;
/// Default working day end, minutes since midnight (20:00)
pub const DEFAULT_DAY_END_MIN: u16 = 20 * 60;

/// Reference-number prefix used when none is configured
pub const DEFAULT_REFERENCE_PREFIX: &str = "RAMILS";

/// Default database pool size
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// The venue's default working window (07:00-20:00), used for staff
/// schedule defaults.
pub fn default_working_window() -> TimeInterval {
    TimeInterval { from_min: DEFAULT_DAY_START_MIN, to_min: DEFAULT_DAY_END_MIN }
}

fn slot(name: &str, from_h: u16, from_m: u16, to_h: u16, to_m: u16) -> Slot {
    Slot::new(name, TimeInterval { from_min: from_h * 60 + from_m, to_min: to_h * 60 + to_m })
}

/// Event catalog: one full-day slot 07:00-20:00.
pub fn full_day_catalog() -> Vec<Slot> {
    vec![slot("Full-Day", 7, 0, 20, 0)]
}

/// Event catalog: morning and afternoon halves.
pub fn half_day_catalog() -> Vec<Slot> {
    vec![slot("Half-Day AM", 7, 0, 12, 0), slot("Half-Day PM", 13, 0, 18, 0)]
}

/// Event catalog: four short-day windows.
pub fn short_day_catalog() -> Vec<Slot> {
    vec![
        slot("Short-Day 1", 7, 0, 10, 0),
        slot("Short-Day 2", 11, 0, 14, 0),
        slot("Short-Day 3", 15, 0, 18, 0),
        slot("Short-Day 4", 19, 0, 20, 0),
    ]
}

/// Appointment catalog: six one-hour consultation slots.
pub fn appointment_catalog() -> Vec<Slot> {
    vec![
        slot("Appointment 1", 8, 0, 9, 0),
        slot("Appointment 2", 9, 30, 10, 30),
        slot("Appointment 3", 11, 0, 12, 0),
        slot("Appointment 4", 13, 0, 14, 0),
        slot("Appointment 5", 14, 30, 15, 30),
        slot("Appointment 6", 16, 0, 17, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_hold_well_formed_intervals() {
        for slot in full_day_catalog()
            .into_iter()
            .chain(half_day_catalog())
            .chain(short_day_catalog())
            .chain(appointment_catalog())
        {
            assert!(slot.interval.from_min < slot.interval.to_min, "{}", slot.name);
        }
    }

    #[test]
    fn default_window_spans_seven_to_twenty() {
        let window = default_working_window();
        assert_eq!(window.to_string(), "07:00-20:00");
    }
}
