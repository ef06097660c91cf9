//! Staff auto-assignment service - core business logic

use std::collections::HashSet;
use std::sync::Arc;

use ramils_domain::{Booking, Result, StaffAssignment, StaffMember};
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{AssignmentRepository, StaffRepository};
use crate::availability::AvailabilityCalendar;

/// Runs once, immediately after an event or service booking is accepted, to
/// assign every staff member whose weekly window fully covers the booking.
///
/// Zero qualifying staff never blocks the booking, and there is no fallback
/// to "assign everyone". Staff capacity is not enforced: a staff member can
/// be auto-assigned to two overlapping bookings (known design gap, kept).
pub struct StaffAutoAssigner {
    staff: Arc<dyn StaffRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    calendar: Arc<AvailabilityCalendar>,
}

impl StaffAutoAssigner {
    /// Create a new auto-assigner
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        calendar: Arc<AvailabilityCalendar>,
    ) -> Self {
        Self { staff, assignments, calendar }
    }

    /// Assign all qualifying staff to the booking and return the created
    /// records. Failures for individual candidates are logged and skipped so
    /// one bad staff record cannot sink the rest.
    pub async fn assign(&self, booking: &Booking) -> Result<Vec<StaffAssignment>> {
        if !booking.kind.staff_assignable() {
            return Ok(Vec::new());
        }

        let mut created = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for staff in self.staff.active_staff().await? {
            if !seen.insert(staff.id.clone()) {
                continue;
            }
            match self.try_assign(booking, &staff).await {
                Ok(Some(assignment)) => created.push(assignment),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        staff_id = %staff.id,
                        booking_id = %booking.id,
                        error = %err,
                        "skipping staff candidate after assignment failure"
                    );
                }
            }
        }

        if created.is_empty() {
            // AssignmentWarning: observable, never an error
            warn!(
                booking_id = %booking.id,
                reference = %booking.reference,
                date = %booking.date,
                interval = %booking.interval,
                "no staff covers this booking; accepted with zero assignments"
            );
        } else {
            info!(
                booking_id = %booking.id,
                assigned = created.len(),
                "staff auto-assignment complete"
            );
        }

        Ok(created)
    }

    async fn try_assign(
        &self,
        booking: &Booking,
        staff: &StaffMember,
    ) -> Result<Option<StaffAssignment>> {
        let qualifies = self
            .calendar
            .is_staff_available(&staff.id, booking.date, &booking.interval)
            .await?;
        if !qualifies {
            return Ok(None);
        }

        let assignment = StaffAssignment {
            id: Uuid::new_v4().to_string(),
            staff_id: staff.id.clone(),
            booking_id: booking.id.clone(),
            booking_kind: booking.kind,
            assigned_role: staff.role.clone(),
        };
        self.assignments.insert_assignment(assignment.clone()).await?;
        Ok(Some(assignment))
    }
}

/// Staff directory operations the scheduler needs: creating records (which
/// seeds the default week), deactivation, and unassignment.
pub struct StaffDirectory {
    staff: Arc<dyn StaffRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    calendar: Arc<AvailabilityCalendar>,
}

impl StaffDirectory {
    /// Create a new directory service
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        calendar: Arc<AvailabilityCalendar>,
    ) -> Self {
        Self { staff, assignments, calendar }
    }

    /// Create a staff record. Without explicit hours the member starts on
    /// the default week (every day 07:00-20:00).
    pub async fn create_staff(
        &self,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<StaffMember> {
        let staff = StaffMember {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            role: role.into(),
            active: true,
        };
        self.staff.create_staff(staff.clone()).await?;
        self.calendar.seed_default_week(&staff.id).await?;
        info!(staff_id = %staff.id, role = %staff.role, "staff member created");
        Ok(staff)
    }

    /// Deactivate a staff member; existing assignments stay in place.
    pub async fn deactivate(&self, staff_id: &str) -> Result<()> {
        self.staff.set_active(staff_id, false).await
    }

    /// Remove one assignment without touching the booking.
    pub async fn unassign(&self, assignment_id: &str) -> Result<()> {
        self.assignments.delete_assignment(assignment_id).await
    }

    /// All assignments attached to one booking
    pub async fn assignments_for_booking(&self, booking_id: &str) -> Result<Vec<StaffAssignment>> {
        self.assignments.assignments_for_booking(booking_id).await
    }
}
