//! SQLite-backed staff directory and assignment repositories.

use std::sync::Arc;

use async_trait::async_trait;
use ramils_core::assignment::ports::{AssignmentRepository, StaffRepository};
use ramils_domain::{Result, SchedulerError, StaffAssignment, StaffMember};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::booking_repository::kind_from_str;
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed staff directory.
pub struct SqliteStaffRepository {
    db: Arc<DbManager>,
}

impl SqliteStaffRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn staff_row(row: &Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        active: row.get(3)?,
    })
}

#[async_trait]
impl StaffRepository for SqliteStaffRepository {
    async fn create_staff(&self, staff: StaffMember) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO staff (id, name, role, active) VALUES (?, ?, ?, ?)",
                params![staff.id, staff.name, staff.role, staff.active],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_staff(&self, staff_id: &str) -> Result<Option<StaffMember>> {
        let db = Arc::clone(&self.db);
        let staff_id = staff_id.to_owned();

        task::spawn_blocking(move || -> Result<Option<StaffMember>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, name, role, active FROM staff WHERE id = ?",
                params![staff_id],
                staff_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn active_staff(&self) -> Result<Vec<StaffMember>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<StaffMember>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT id, name, role, active FROM staff WHERE active = 1 ORDER BY name")
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map([], staff_row)
                .map_err(map_sql_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(map_sql_error);
            rows
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_active(&self, staff_id: &str, active: bool) -> Result<()> {
        let db = Arc::clone(&self.db);
        let staff_id = staff_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE staff SET active = ? WHERE id = ?",
                    params![active, staff_id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SchedulerError::NotFound(format!("staff {staff_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAssignmentRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepository {
    async fn insert_assignment(&self, assignment: StaffAssignment) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO staff_assignments
                     (id, staff_id, booking_id, booking_kind, assigned_role)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    assignment.id,
                    assignment.staff_id,
                    assignment.booking_id,
                    assignment.booking_kind.label(),
                    assignment.assigned_role,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_assignment(&self, assignment_id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let assignment_id = assignment_id.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "DELETE FROM staff_assignments WHERE id = ?",
                    params![assignment_id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SchedulerError::NotFound(format!("assignment {assignment_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn assignments_for_booking(&self, booking_id: &str) -> Result<Vec<StaffAssignment>> {
        let db = Arc::clone(&self.db);
        let booking_id = booking_id.to_owned();

        task::spawn_blocking(move || -> Result<Vec<StaffAssignment>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, staff_id, booking_id, booking_kind, assigned_role
                     FROM staff_assignments WHERE booking_id = ?",
                )
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![booking_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })
                .map_err(map_sql_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(map_sql_error)?;

            rows.into_iter()
                .map(|(id, staff_id, booking_id, kind, assigned_role)| {
                    Ok(StaffAssignment {
                        id,
                        staff_id,
                        booking_id,
                        booking_kind: kind_from_str(&kind)?,
                        assigned_role,
                    })
                })
                .collect()
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use ramils_domain::BookingKind;
    use tempfile::TempDir;

    use super::*;

    fn repos() -> (SqliteStaffRepository, SqliteAssignmentRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(DbManager::new(dir.path().join("ramils.db"), 2).unwrap());
        db.run_migrations().unwrap();
        (SqliteStaffRepository::new(db.clone()), SqliteAssignmentRepository::new(db), dir)
    }

    fn member(id: &str, name: &str, role: &str) -> StaffMember {
        StaffMember { id: id.into(), name: name.into(), role: role.into(), active: true }
    }

    #[tokio::test]
    async fn deactivated_staff_drop_out_of_the_active_list() {
        let (staff, _, _dir) = repos();
        staff.create_staff(member("s1", "Alma", "Coordinator")).await.unwrap();
        staff.create_staff(member("s2", "Ben", "Waiter")).await.unwrap();

        staff.set_active("s2", false).await.unwrap();
        let active = staff.active_staff().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "s1");

        let stored = staff.get_staff("s2").await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn duplicate_assignment_for_same_booking_is_rejected() {
        let (staff, assignments, _dir) = repos();
        staff.create_staff(member("s1", "Alma", "Coordinator")).await.unwrap();

        let assignment = StaffAssignment {
            id: "a1".into(),
            staff_id: "s1".into(),
            booking_id: "bk1".into(),
            booking_kind: BookingKind::Event,
            assigned_role: "Coordinator".into(),
        };
        assignments.insert_assignment(assignment.clone()).await.unwrap();

        let duplicate = StaffAssignment { id: "a2".into(), ..assignment };
        assert!(assignments.insert_assignment(duplicate).await.is_err());
    }

    #[tokio::test]
    async fn unassign_leaves_other_assignments_in_place() {
        let (staff, assignments, _dir) = repos();
        staff.create_staff(member("s1", "Alma", "Coordinator")).await.unwrap();
        staff.create_staff(member("s2", "Ben", "Waiter")).await.unwrap();

        for (id, staff_id, role) in [("a1", "s1", "Coordinator"), ("a2", "s2", "Waiter")] {
            assignments
                .insert_assignment(StaffAssignment {
                    id: id.into(),
                    staff_id: staff_id.into(),
                    booking_id: "bk1".into(),
                    booking_kind: BookingKind::Service,
                    assigned_role: role.into(),
                })
                .await
                .unwrap();
        }

        assignments.delete_assignment("a1").await.unwrap();
        let remaining = assignments.assignments_for_booking("bk1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "a2");
    }
}
