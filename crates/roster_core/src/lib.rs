//! Core data access for departments, employees and performance reviews.
//! Rows live in SQLite; each row has exactly one shared in-memory instance.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod roster;

pub use db::{DbConfig, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::department::{Department, DepartmentRecord, SharedDepartment};
pub use model::employee::{Employee, EmployeeRecord, SharedEmployee};
pub use model::review::{Review, ReviewRecord, SharedReview};
pub use model::validation::{ReferenceLookup, ValidationError, MIN_REVIEW_YEAR};
pub use model::RecordId;
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::identity_map::IdentityMap;
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::{RepoError, RepoResult};
pub use roster::{Roster, RosterDepartments, RosterEmployees, RosterReviews};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
