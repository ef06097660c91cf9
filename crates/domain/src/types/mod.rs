//! Domain types and models

pub mod availability;
pub mod booking;
pub mod slots;
pub mod staff;
pub mod time;

pub use availability::{
    all_weekdays, AvailabilityRule, AvailabilityStatus, BlockedDate, DayScheduleEntry,
    WeekSchedule,
};
pub use booking::{
    format_reference, Booking, BookingKind, BookingRequest, BookingStatus, CalendarEntry,
};
pub use slots::{DayStatus, Slot, SlotStatus};
pub use staff::{StaffAssignment, StaffMember};
pub use time::{format_minutes, parse_time_of_day, TimeInterval, MINUTES_PER_DAY};
