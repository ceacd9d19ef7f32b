//! Table adapters and the identity maps they resolve rows through.
//!
//! # Responsibility
//! - Keep SQL for `departments`, `employees` and `reviews` inside one boundary.
//! - Hand out one shared instance per persisted row.
//!
//! # Invariants
//! - Rows are validated into entities before they are cached or returned.
//! - Storage errors are wrapped, never translated into validation errors.
//! - `save` refuses instances that already carry an id.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use rusqlite::types::FromSql;
use rusqlite::{Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod employee_repo;
pub mod identity_map;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// A field value was rejected before any row was written.
    Validation(ValidationError),
    /// The storage call itself failed.
    Db(DbError),
    /// `save` was called on an instance that already has a row.
    AlreadyPersisted { table: &'static str, id: RecordId },
    /// `update` or `delete` was called on an instance without a row.
    NotPersisted { table: &'static str },
    /// The instance's row no longer exists.
    NotFound { table: &'static str, id: RecordId },
    /// A stored row cannot be read back into an entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyPersisted { table, id } => {
                write!(f, "{table} row {id} is already persisted; use update instead")
            }
            Self::NotPersisted { table } => write!(f, "{table} instance has not been saved"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::AlreadyPersisted { .. } => None,
            Self::NotPersisted { .. } => None,
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `sql` and parses every row before any of them is resolved.
///
/// Parsing eagerly releases the statement, so resolving a row may issue
/// further queries on the same connection.
pub(crate) fn collect_rows<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

/// Reads a column the schema allows to be NULL but the entity does not.
pub(crate) fn required_column<T: FromSql>(
    row: &Row<'_>,
    table: &str,
    column: &str,
) -> RepoResult<T> {
    match row.get::<_, Option<T>>(column)? {
        Some(value) => Ok(value),
        None => {
            let id: RecordId = row.get("id")?;
            Err(RepoError::InvalidData(format!(
                "{table}.{column} is NULL for id {id}"
            )))
        }
    }
}
