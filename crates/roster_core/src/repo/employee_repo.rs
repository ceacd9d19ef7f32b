//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - `department_id` is checked against the injected department lookup when
//!   an employee is built or reassigned, including rows read back from storage.
//! - Deleting an employee leaves its reviews untouched.

use super::identity_map::IdentityMap;
use super::{collect_rows, required_column, RepoError, RepoResult};
use crate::model::employee::{Employee, EmployeeRecord, SharedEmployee};
use crate::model::validation::ReferenceLookup;
use crate::model::RecordId;
use log::info;
use rusqlite::{params, Connection, Row, ToSql};
use std::rc::Rc;

const TABLE: &str = "employees";

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, job_title, department_id FROM employees";

/// Repository interface for employee persistence.
pub trait EmployeeRepository {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts an unsaved employee and caches it under its new id.
    fn save(&self, employee: &SharedEmployee) -> RepoResult<RecordId>;
    /// Validates (including the department check), inserts and caches.
    fn create(
        &self,
        name: &str,
        job_title: &str,
        department_id: RecordId,
    ) -> RepoResult<SharedEmployee>;
    fn update(&self, employee: &Employee) -> RepoResult<()>;
    fn delete(&self, employee: &Employee) -> RepoResult<()>;
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedEmployee>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<SharedEmployee>>;
    fn get_all(&self) -> RepoResult<Vec<SharedEmployee>>;
    /// Employees whose `department_id` equals `department_id`, in row order.
    fn list_for_department(&self, department_id: RecordId) -> RepoResult<Vec<SharedEmployee>>;
}

/// SQLite-backed employee repository.
///
/// `D` answers department existence checks; in practice it is the department
/// repository sharing the same connection.
pub struct SqliteEmployeeRepository<'conn, D> {
    conn: &'conn Connection,
    cache: &'conn IdentityMap<Employee>,
    departments: D,
}

impl<'conn, D> SqliteEmployeeRepository<'conn, D>
where
    D: ReferenceLookup<Error = RepoError>,
{
    pub fn new(
        conn: &'conn Connection,
        cache: &'conn IdentityMap<Employee>,
        departments: D,
    ) -> Self {
        Self {
            conn,
            cache,
            departments,
        }
    }

    /// Lookup used for `department_id` checks, e.g. for `Employee::new`.
    pub fn departments(&self) -> &D {
        &self.departments
    }

    /// Moves `employee` to `department_id` after a live department check.
    ///
    /// Only the in-memory value changes; call `update` to write it.
    pub fn reassign(&self, employee: &Employee, department_id: RecordId) -> RepoResult<()> {
        employee.set_department_id(department_id, &self.departments)
    }

    fn resolve(&self, record: EmployeeRecord) -> RepoResult<SharedEmployee> {
        let id = record
            .id
            .ok_or_else(|| RepoError::InvalidData("employees row without id".to_string()))?;
        let fresh = Employee::from_record(record, &self.departments)?;
        Ok(self.cache.resolve(id, fresh, Employee::refresh_from))
    }

    fn resolve_all(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<SharedEmployee>> {
        collect_rows(self.conn, sql, params, parse_employee_row)?
            .into_iter()
            .map(|record| self.resolve(record))
            .collect()
    }
}

impl<D> EmployeeRepository for SqliteEmployeeRepository<'_, D>
where
    D: ReferenceLookup<Error = RepoError>,
{
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY,
                name TEXT,
                job_title TEXT,
                department_id INTEGER,
                FOREIGN KEY (department_id) REFERENCES departments(id)
            );",
        )?;
        info!("event=table_create module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS employees;")?;
        info!("event=table_drop module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn save(&self, employee: &SharedEmployee) -> RepoResult<RecordId> {
        if let Some(id) = employee.id() {
            return Err(RepoError::AlreadyPersisted { table: TABLE, id });
        }

        self.conn.execute(
            "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3);",
            params![
                employee.name(),
                employee.job_title(),
                employee.department_id()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        employee.assign_id(Some(id));
        self.cache.insert(id, Rc::clone(employee));

        info!(
            "event=record_insert module=repo table={TABLE} status=ok id={id} department_id={}",
            employee.department_id()
        );
        Ok(id)
    }

    fn create(
        &self,
        name: &str,
        job_title: &str,
        department_id: RecordId,
    ) -> RepoResult<SharedEmployee> {
        let employee = Rc::new(Employee::new(
            name,
            job_title,
            department_id,
            &self.departments,
        )?);
        self.save(&employee)?;
        Ok(employee)
    }

    fn update(&self, employee: &Employee) -> RepoResult<()> {
        let id = employee
            .id()
            .ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self.conn.execute(
            "UPDATE employees SET name = ?1, job_title = ?2, department_id = ?3 WHERE id = ?4;",
            params![
                employee.name(),
                employee.job_title(),
                employee.department_id(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }

        info!("event=record_update module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn delete(&self, employee: &Employee) -> RepoResult<()> {
        let id = employee
            .id()
            .ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }
        self.cache.evict(id);
        employee.assign_id(None);

        info!("event=record_delete module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedEmployee>> {
        let mut found =
            self.resolve_all(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"), &[&id])?;
        Ok(found.pop())
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<SharedEmployee>> {
        let mut found = self.resolve_all(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE name = ?1 ORDER BY id LIMIT 1;"),
            &[&name],
        )?;
        Ok(found.pop())
    }

    fn get_all(&self) -> RepoResult<Vec<SharedEmployee>> {
        self.resolve_all(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id;"), &[])
    }

    fn list_for_department(&self, department_id: RecordId) -> RepoResult<Vec<SharedEmployee>> {
        self.resolve_all(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE department_id = ?1 ORDER BY id;"),
            &[&department_id],
        )
    }
}

impl<D> ReferenceLookup for SqliteEmployeeRepository<'_, D>
where
    D: ReferenceLookup<Error = RepoError>,
{
    type Error = RepoError;

    fn reference_exists(&self, id: RecordId) -> RepoResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<EmployeeRecord> {
    Ok(EmployeeRecord {
        id: Some(row.get("id")?),
        name: required_column(row, TABLE, "name")?,
        job_title: required_column(row, TABLE, "job_title")?,
        department_id: required_column(row, TABLE, "department_id")?,
    })
}
