//! Registry owning the shared connection and the identity maps.
//!
//! # Responsibility
//! - Own the single connection every repository runs on.
//! - Own one identity map per table for the lifetime of the registry.
//! - Wire referential lookups (employees → departments, reviews → employees)
//!   and host the relationship accessors that need both sides.
//!
//! # Invariants
//! - Identity maps are created with the registry and only emptied by
//!   `reset_caches` or by dropping the registry.
//! - Repositories are cheap borrowed views; create them per call.

use crate::db::{open_db_in_memory_with_config, open_db_with_config, DbConfig};
use crate::model::department::Department;
use crate::model::employee::{Employee, SharedEmployee};
use crate::model::review::{Review, SharedReview};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::identity_map::IdentityMap;
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;
use std::path::Path;

/// Department repository bound to a registry.
pub type RosterDepartments<'r> = SqliteDepartmentRepository<'r>;
/// Employee repository checking departments through the same registry.
pub type RosterEmployees<'r> = SqliteEmployeeRepository<'r, RosterDepartments<'r>>;
/// Review repository checking employees through the same registry.
pub type RosterReviews<'r> = SqliteReviewRepository<'r, RosterEmployees<'r>>;

/// Single-connection entry point for departments, employees and reviews.
pub struct Roster {
    conn: Connection,
    department_cache: IdentityMap<Department>,
    employee_cache: IdentityMap<Employee>,
    review_cache: IdentityMap<Review>,
}

impl Roster {
    /// Wraps an already configured connection.
    pub fn with_connection(conn: Connection) -> Self {
        Self {
            conn,
            department_cache: IdentityMap::new("departments"),
            employee_cache: IdentityMap::new("employees"),
            review_cache: IdentityMap::new("reviews"),
        }
    }

    /// Opens a database file with default settings.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::open_with_config(path, &DbConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: &DbConfig) -> RepoResult<Self> {
        Ok(Self::with_connection(open_db_with_config(path, config)?))
    }

    /// Opens a private in-memory database with default settings.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open_in_memory_with_config(&DbConfig::default())
    }

    pub fn open_in_memory_with_config(config: &DbConfig) -> RepoResult<Self> {
        Ok(Self::with_connection(open_db_in_memory_with_config(config)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn departments(&self) -> RosterDepartments<'_> {
        SqliteDepartmentRepository::new(&self.conn, &self.department_cache)
    }

    pub fn employees(&self) -> RosterEmployees<'_> {
        SqliteEmployeeRepository::new(&self.conn, &self.employee_cache, self.departments())
    }

    pub fn reviews(&self) -> RosterReviews<'_> {
        SqliteReviewRepository::new(&self.conn, &self.review_cache, self.employees())
    }

    /// Creates all three tables, parents first.
    pub fn create_tables(&self) -> RepoResult<()> {
        self.departments().create_table()?;
        self.employees().create_table()?;
        self.reviews().create_table()?;
        Ok(())
    }

    /// Drops all three tables, children first. Cached instances are kept.
    pub fn drop_tables(&self) -> RepoResult<()> {
        self.reviews().drop_table()?;
        self.employees().drop_table()?;
        self.departments().drop_table()?;
        Ok(())
    }

    /// Employees currently pointing at `department`.
    ///
    /// An unsaved department has no employees.
    pub fn employees_of(&self, department: &Department) -> RepoResult<Vec<SharedEmployee>> {
        match department.id() {
            Some(id) => self.employees().list_for_department(id),
            None => Ok(Vec::new()),
        }
    }

    /// Reviews currently pointing at `employee`.
    pub fn reviews_of(&self, employee: &Employee) -> RepoResult<Vec<SharedReview>> {
        match employee.id() {
            Some(id) => self.reviews().list_for_employee(id),
            None => Ok(Vec::new()),
        }
    }

    pub fn department_cache(&self) -> &IdentityMap<Department> {
        &self.department_cache
    }

    pub fn employee_cache(&self) -> &IdentityMap<Employee> {
        &self.employee_cache
    }

    pub fn review_cache(&self) -> &IdentityMap<Review> {
        &self.review_cache
    }

    /// Empties every identity map. Later fetches build fresh instances.
    pub fn reset_caches(&self) {
        self.review_cache.clear();
        self.employee_cache.clear();
        self.department_cache.clear();
        info!("event=identity_map_reset module=roster status=ok");
    }
}
