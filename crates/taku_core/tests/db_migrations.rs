use taku_core::db::migrations::latest_version;
use taku_core::db::{open_db, open_db_in_memory};

fn table_exists(conn: &rusqlite::Connection, table: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

#[test]
fn migrations_create_core_tables() {
    let conn = open_db_in_memory().unwrap();

    for table in ["workspaces", "tasks", "time_entries", "export_log"] {
        assert!(table_exists(&conn, table), "missing table {table}");
    }

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn tasks_table_has_expected_columns() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(tasks);").unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        let column_name: String = row.get(1).unwrap();
        columns.push(column_name);
    }

    for expected in [
        "uuid",
        "workspace_uuid",
        "title",
        "column_name",
        "priority",
        "time_spent",
        "is_active",
        "start_time",
    ] {
        assert!(
            columns.contains(&expected.to_string()),
            "missing column {expected}"
        );
    }
}

#[test]
fn reopening_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taku.db");

    let first = open_db(&path).unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let version: u32 = second
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}
