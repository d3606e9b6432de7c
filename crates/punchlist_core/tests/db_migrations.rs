use punchlist_core::db::migrations::latest_version;
use punchlist_core::db::{open_connection, DbError};
use rusqlite::Connection;

#[test]
fn open_connection_applies_all_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_connection(dir.path().join("punchlist.db")).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "records");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("punchlist.db");

    let conn_first = open_connection(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_connection(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "records");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_connection(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_defaults_are_server_authoritative() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_connection(dir.path().join("punchlist.db")).unwrap();

    // Insert through raw SQL the way the repository does: text only.
    conn.execute("INSERT INTO records (task) VALUES ('raw');", [])
        .unwrap();

    let (done, created_at_ms): (i64, i64) = conn
        .query_row(
            "SELECT done, created_at_ms FROM records WHERE task = 'raw';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(done, 0);
    assert!(created_at_ms > 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
