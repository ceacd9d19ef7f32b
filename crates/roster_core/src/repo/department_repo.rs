//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - Every department returned comes from the department identity map.
//! - Deleting a department leaves its employees untouched.

use super::identity_map::IdentityMap;
use super::{collect_rows, required_column, RepoError, RepoResult};
use crate::model::department::{Department, DepartmentRecord, SharedDepartment};
use crate::model::validation::ReferenceLookup;
use crate::model::RecordId;
use log::info;
use rusqlite::{params, Connection, Row, ToSql};
use std::rc::Rc;

const TABLE: &str = "departments";

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

/// Repository interface for department persistence.
pub trait DepartmentRepository {
    /// Creates the `departments` table if missing.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops the `departments` table if present.
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts an unsaved department and caches it under its new id.
    fn save(&self, department: &SharedDepartment) -> RepoResult<RecordId>;
    /// Validates, inserts and caches a new department.
    fn create(&self, name: &str, location: &str) -> RepoResult<SharedDepartment>;
    /// Writes current field values to the department's row.
    fn update(&self, department: &Department) -> RepoResult<()>;
    /// Deletes the row, evicts the cache entry and clears the id.
    fn delete(&self, department: &Department) -> RepoResult<()>;
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedDepartment>>;
    /// First department with exactly this name, in row order.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<SharedDepartment>>;
    /// All departments in row order.
    fn get_all(&self) -> RepoResult<Vec<SharedDepartment>>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
    cache: &'conn IdentityMap<Department>,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn new(conn: &'conn Connection, cache: &'conn IdentityMap<Department>) -> Self {
        Self { conn, cache }
    }

    fn resolve(&self, record: DepartmentRecord) -> RepoResult<SharedDepartment> {
        let id = record
            .id
            .ok_or_else(|| RepoError::InvalidData("departments row without id".to_string()))?;
        let fresh = Department::from_record(record)?;
        Ok(self.cache.resolve(id, fresh, Department::refresh_from))
    }

    fn find_one(&self, sql: &str, param: &dyn ToSql) -> RepoResult<Option<SharedDepartment>> {
        let record = collect_rows(self.conn, sql, [param], parse_department_row)?
            .into_iter()
            .next();
        record.map(|record| self.resolve(record)).transpose()
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY,
                name TEXT,
                location TEXT
            );",
        )?;
        info!("event=table_create module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS departments;")?;
        info!("event=table_drop module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn save(&self, department: &SharedDepartment) -> RepoResult<RecordId> {
        if let Some(id) = department.id() {
            return Err(RepoError::AlreadyPersisted { table: TABLE, id });
        }

        self.conn.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2);",
            params![department.name(), department.location()],
        )?;
        let id = self.conn.last_insert_rowid();
        department.assign_id(Some(id));
        self.cache.insert(id, Rc::clone(department));

        info!("event=record_insert module=repo table={TABLE} status=ok id={id}");
        Ok(id)
    }

    fn create(&self, name: &str, location: &str) -> RepoResult<SharedDepartment> {
        let department = Rc::new(Department::new(name, location)?);
        self.save(&department)?;
        Ok(department)
    }

    fn update(&self, department: &Department) -> RepoResult<()> {
        let id = department
            .id()
            .ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3;",
            params![department.name(), department.location(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }

        info!("event=record_update module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn delete(&self, department: &Department) -> RepoResult<()> {
        let id = department
            .id()
            .ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }
        self.cache.evict(id);
        department.assign_id(None);

        info!("event=record_delete module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedDepartment>> {
        self.find_one(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"), &id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<SharedDepartment>> {
        self.find_one(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1 ORDER BY id LIMIT 1;"),
            &name,
        )
    }

    fn get_all(&self) -> RepoResult<Vec<SharedDepartment>> {
        collect_rows(
            self.conn,
            &format!("{DEPARTMENT_SELECT_SQL} ORDER BY id;"),
            [],
            parse_department_row,
        )?
        .into_iter()
        .map(|record| self.resolve(record))
        .collect()
    }
}

impl ReferenceLookup for SqliteDepartmentRepository<'_> {
    type Error = RepoError;

    fn reference_exists(&self, id: RecordId) -> RepoResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<DepartmentRecord> {
    Ok(DepartmentRecord {
        id: Some(row.get("id")?),
        name: required_column(row, TABLE, "name")?,
        location: required_column(row, TABLE, "location")?,
    })
}
