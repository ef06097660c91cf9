//! Database implementations

pub mod availability_repository;
pub mod booking_repository;
pub mod manager;
pub mod staff_repository;

pub use availability_repository::SqliteAvailabilityRepository;
pub use booking_repository::SqliteBookingRepository;
pub use manager::{DbConnection, DbManager};
pub use staff_repository::{SqliteAssignmentRepository, SqliteStaffRepository};
