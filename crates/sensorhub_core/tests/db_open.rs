use rusqlite::Connection;
use sensorhub_core::db::{open_document, open_relational, open_relational_in_memory};
use sensorhub_core::{
    DbError, DocumentDeviceRepository, SensorDevice, SensorDeviceRepository,
    SqliteDeviceRepository, Store, StoreBackend, StoreConfig,
};

#[test]
fn open_relational_in_memory_creates_device_table() {
    let conn = open_relational_in_memory().unwrap();

    assert_table_exists(&conn, "sensor_devices");
    assert!(SqliteDeviceRepository::try_new(&conn).is_ok());
}

#[test]
fn opening_same_relational_file_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensorhub.sqlite3");

    let conn_first = open_relational(&path).unwrap();
    SqliteDeviceRepository::try_new(&conn_first)
        .unwrap()
        .create(&SensorDevice::new("Kept", "Light", "Hall", "SENSOR-100"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_relational(&path).unwrap();
    let repo = SqliteDeviceRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn opening_relational_store_on_a_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    let err = open_relational(dir.path()).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn opening_document_store_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensorhub.redb");

    drop(open_document(&path).unwrap());
    let db = open_document(&path).unwrap();
    assert!(DocumentDeviceRepository::try_new(&db).is_ok());
}

#[test]
fn store_open_follows_configured_backend() {
    let dir = tempfile::tempdir().unwrap();
    let base = StoreConfig {
        backend: StoreBackend::Relational,
        data_dir: dir.path().join("data"),
    };

    let relational = Store::open(&base).unwrap();
    assert_eq!(relational.backend(), StoreBackend::Relational);
    assert!(base.relational_path().exists());
    relational.close().unwrap();

    let document_config = base.with_backend(StoreBackend::Document);
    let document = Store::open(&document_config).unwrap();
    assert_eq!(document.backend(), StoreBackend::Document);
    assert!(document_config.document_path().exists());
    document.close().unwrap();
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
