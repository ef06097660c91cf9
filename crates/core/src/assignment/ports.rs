//! Port interfaces for the staff directory and assignment records

use async_trait::async_trait;
use ramils_domain::{Result, StaffAssignment, StaffMember};

/// Staff directory persistence.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a staff record
    async fn create_staff(&self, staff: StaffMember) -> Result<()>;

    /// Fetch one staff member by id
    async fn get_staff(&self, staff_id: &str) -> Result<Option<StaffMember>>;

    /// All active staff members
    async fn active_staff(&self) -> Result<Vec<StaffMember>>;

    /// Activate or deactivate a staff member
    async fn set_active(&self, staff_id: &str, active: bool) -> Result<()>;
}

/// Assignment-record persistence. Assignments link one staff member to one
/// booking and are deleted independently of it.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Insert an assignment record
    async fn insert_assignment(&self, assignment: StaffAssignment) -> Result<()>;

    /// Delete an assignment by id (unassign)
    async fn delete_assignment(&self, assignment_id: &str) -> Result<()>;

    /// All assignments attached to one booking
    async fn assignments_for_booking(&self, booking_id: &str) -> Result<Vec<StaffAssignment>>;
}
