//! SQLite connection bootstrap.
//!
//! # Responsibility
//! - Open file or in-memory connections with the configured pragmas.
//! - Wrap driver failures in one storage error type.
//!
//! # Invariants
//! - The connection runs in autocommit mode; every statement is committed
//!   as soon as it completes.
//! - Foreign keys stay unenforced unless `DbConfig` asks for them, so
//!   references are only checked at assignment time.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
mod open;

pub use config::DbConfig;
pub use open::{open_db, open_db_in_memory, open_db_in_memory_with_config, open_db_with_config};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer failure, passed through untranslated.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
