use rusqlite::Connection;
use zentask_core::db::migrations::{latest_version, schema_version};
use zentask_core::db::{open_data_dir, open_db, open_db_in_memory, DbError, DB_FILE_NAME};

fn kv_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(kv_store);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

#[test]
fn in_memory_database_gets_kv_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(kv_columns(&conn), vec!["key", "value", "updated_at"]);
}

#[test]
fn stored_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES ('probe', '[]');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let (value, updated_at): (String, i64) = conn
        .query_row(
            "SELECT value, updated_at FROM kv_store WHERE key = 'probe';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(value, "[]");
    assert!(updated_at > 0);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn data_dir_is_created_with_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("a").join("b");

    let _conn = open_data_dir(&data_dir).unwrap();
    assert!(data_dir.join(DB_FILE_NAME).is_file());
}

#[test]
fn data_dir_that_is_a_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = open_data_dir(&blocker).unwrap_err();
    assert!(matches!(err, DbError::DataDir { ref path, .. } if path == &blocker));
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    match open_db(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("future schema was accepted"),
    }
}
