//! Staff directory records and booking assignments

use serde::{Deserialize, Serialize};

use super::booking::BookingKind;

/// A schedulable staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    /// Current role, copied onto assignments at assignment time
    pub role: String,
    pub active: bool,
}

/// Links one staff member to exactly one event or service booking.
///
/// Created by the auto-assigner or explicit admin action; removed
/// independently (unassign) without touching the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAssignment {
    pub id: String,
    pub staff_id: String,
    pub booking_id: String,
    pub booking_kind: BookingKind,
    /// Role snapshot taken when the assignment was created
    pub assigned_role: String,
}
