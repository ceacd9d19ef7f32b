use roster_core::db::{open_db_in_memory, open_db_in_memory_with_config};
use roster_core::{DbConfig, DepartmentRepository, Roster};
use rusqlite::Connection;

fn foreign_keys_enabled(conn: &Connection) -> bool {
    let value: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    value == 1
}

#[test]
fn default_connection_leaves_foreign_keys_off() {
    let conn = open_db_in_memory().unwrap();
    assert!(!foreign_keys_enabled(&conn));
}

#[test]
fn config_can_enforce_foreign_keys() {
    let config = DbConfig {
        enforce_foreign_keys: true,
        ..DbConfig::default()
    };
    let conn = open_db_in_memory_with_config(&config).unwrap();
    assert!(foreign_keys_enabled(&conn));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: DbConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DbConfig::default());

    let config: DbConfig = serde_json::from_str(r#"{"enforce_foreign_keys": true}"#).unwrap();
    assert!(config.enforce_foreign_keys);
    assert_eq!(config.busy_timeout_ms, DbConfig::default().busy_timeout_ms);
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");

    let id = {
        let roster = Roster::open(&path).unwrap();
        roster.create_tables().unwrap();
        let department = roster.departments().create("Engineering", "Building A").unwrap();
        department.id().unwrap()
    };

    let roster = Roster::open(&path).unwrap();
    roster.create_tables().unwrap();
    let department = roster
        .departments()
        .find_by_name("Engineering")
        .unwrap()
        .unwrap();
    assert_eq!(department.id(), Some(id));
    assert_eq!(department.location(), "Building A");
}
