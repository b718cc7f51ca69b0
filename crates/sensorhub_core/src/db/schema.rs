//! Relational schema for the `sensor_devices` table.
//!
//! # Responsibility
//! - Create the device table and its indexes on a fresh connection.
//! - Describe the columns repositories rely on.
//!
//! # Invariants
//! - Applying the schema is idempotent and never drops data.
//! - There is no version tracking; the table shape is fixed.

use crate::db::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Columns every relational repository expects on `sensor_devices`.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "device_name",
    "sensor_type",
    "location",
    "status",
    "last_reading",
    "unit",
    "device_id",
];

/// Creates the device table and indexes when they do not exist yet.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}
