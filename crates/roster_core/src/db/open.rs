//! Opening and configuring SQLite connections.

use super::{DbConfig, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Opens (or creates) a database file with default settings.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_config(path, &DbConfig::default())
}

/// Opens a private in-memory database with default settings.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db_in_memory_with_config(&DbConfig::default())
}

/// Opens a database file and applies `config`.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db_with_config(path: impl AsRef<Path>, config: &DbConfig) -> DbResult<Connection> {
    open_logged("file", config, || Connection::open(path))
}

/// Opens an in-memory database and applies `config`.
pub fn open_db_in_memory_with_config(config: &DbConfig) -> DbResult<Connection> {
    open_logged("memory", config, Connection::open_in_memory)
}

fn open_logged(
    mode: &str,
    config: &DbConfig,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = open()
        .map_err(Into::into)
        .and_then(|conn| configure(&conn, config).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} foreign_keys={} duration_ms={}",
            config.enforce_foreign_keys,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn configure(conn: &Connection, config: &DbConfig) -> DbResult<()> {
    let pragma = if config.enforce_foreign_keys {
        "PRAGMA foreign_keys = ON;"
    } else {
        "PRAGMA foreign_keys = OFF;"
    };
    conn.execute_batch(pragma)?;
    conn.busy_timeout(config.busy_timeout())?;
    Ok(())
}
