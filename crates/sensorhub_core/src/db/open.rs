//! Connection bootstrap utilities for both stores.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections and redb databases.
//! - Make sure the device table / collection exists before returning.
//!
//! # Invariants
//! - Returned SQLite connections have `foreign_keys=ON` and the schema applied.
//! - Returned redb databases contain the device collection table.

use super::schema::apply_schema;
use super::{DbError, DbResult, DEVICE_COLLECTION};
use log::{error, info};
use redb::backends::InMemoryBackend;
use redb::Database;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies the device schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_relational(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start backend=relational mode=file");

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));
    log_open_result("relational", "file", started_at, result)
}

/// Opens an in-memory SQLite database and applies the device schema.
pub fn open_relational_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start backend=relational mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));
    log_open_result("relational", "memory", started_at, result)
}

/// Opens (or creates) a redb document database file.
///
/// # Side effects
/// - Creates the device collection table when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_document(path: impl AsRef<Path>) -> DbResult<Database> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start backend=document mode=file");

    let result = Database::create(path)
        .map_err(DbError::from)
        .and_then(|db| ensure_collection(&db).map(|()| db));
    log_open_result("document", "file", started_at, result)
}

/// Opens a redb document database backed by memory only.
pub fn open_document_in_memory() -> DbResult<Database> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start backend=document mode=memory");

    let result = Database::builder()
        .create_with_backend(InMemoryBackend::new())
        .map_err(DbError::from)
        .and_then(|db| ensure_collection(&db).map(|()| db));
    log_open_result("document", "memory", started_at, result)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(SQLITE_BUSY_TIMEOUT)?;
    apply_schema(conn)?;
    Ok(())
}

fn ensure_collection(db: &Database) -> DbResult<()> {
    let txn = db.begin_write()?;
    txn.open_table(DEVICE_COLLECTION)?;
    txn.commit()?;
    Ok(())
}

fn log_open_result<T>(
    backend: &str,
    mode: &str,
    started_at: Instant,
    result: DbResult<T>,
) -> DbResult<T> {
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok backend={} mode={} duration_ms={}",
            backend,
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error backend={} mode={} duration_ms={} error_code=db_open_failed error={}",
            backend,
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
