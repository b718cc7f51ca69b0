//! SQLite implementation of the device repository.
//!
//! # Responsibility
//! - Map `SensorDevice` values onto rows of `sensor_devices`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every statement is parameterized.
//! - `find_all` is ordered by `device_name ASC, id ASC`.
//! - Read paths reject undecodable rows instead of masking them.
//! - NULL `status`/`unit` read as empty text and NULL `last_reading` as 0.0.

use crate::db::schema::REQUIRED_COLUMNS;
use crate::db::DEVICE_TABLE;
use crate::model::device::{IdPolicy, InvalidRecordId, SensorDevice, DEFAULT_LAST_READING};
use crate::repo::device_repo::{RepoError, RepoResult, SensorDeviceRepository};
use log::debug;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const DEVICE_SELECT_SQL: &str = "SELECT
    id,
    device_name,
    sensor_type,
    location,
    status,
    last_reading,
    unit,
    device_id
FROM sensor_devices";

/// SQLite-backed device repository borrowing the process connection.
pub struct SqliteDeviceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeviceRepository<'conn> {
    /// Creates a repository after checking the device table shape.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `sensor_devices` does not exist.
    /// - `MissingRequiredColumn` when an expected column is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_device_table(conn)?;
        Ok(Self { conn })
    }
}

impl SensorDeviceRepository for SqliteDeviceRepository<'_> {
    fn id_policy(&self) -> IdPolicy {
        IdPolicy::CallerOrGenerated
    }

    fn create(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        let id = device
            .assigned_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.conn.execute(
            "INSERT INTO sensor_devices (
                id,
                device_name,
                sensor_type,
                location,
                status,
                last_reading,
                unit,
                device_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.as_str(),
                device.device_name.as_str(),
                device.sensor_type.as_str(),
                device.location.as_str(),
                device.status.as_str(),
                device.reading_for_storage(),
                device.unit.as_str(),
                device.device_id.as_str(),
            ],
        )?;

        Ok(device.with_id(id))
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<SensorDevice>> {
        let id = match parse_row_id(id) {
            Ok(id) => id,
            Err(err) => {
                debug!("event=device_lookup module=repo status=skip backend=relational reason={err}");
                return Ok(None);
            }
        };

        let mut stmt = self
            .conn
            .prepare(&format!("{DEVICE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_device_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<SensorDevice>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEVICE_SELECT_SQL} ORDER BY device_name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut devices = Vec::new();

        while let Some(row) = rows.next()? {
            devices.push(parse_device_row(row)?);
        }

        Ok(devices)
    }

    fn update(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        let Some(id) = device.assigned_id() else {
            return Err(RepoError::NotFound(device.id.clone().unwrap_or_default()));
        };

        let changed = self.conn.execute(
            "UPDATE sensor_devices
             SET
                device_name = ?1,
                sensor_type = ?2,
                location = ?3,
                status = ?4,
                last_reading = ?5,
                unit = ?6,
                device_id = ?7
             WHERE id = ?8;",
            params![
                device.device_name.as_str(),
                device.sensor_type.as_str(),
                device.location.as_str(),
                device.status.as_str(),
                device.reading_for_storage(),
                device.unit.as_str(),
                device.device_id.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(device.with_id(id))
    }

    fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        let Ok(id) = parse_row_id(id) else {
            return Ok(false);
        };

        let changed = self
            .conn
            .execute("DELETE FROM sensor_devices WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn exists_by_id(&self, id: &str) -> RepoResult<bool> {
        let Ok(id) = parse_row_id(id) else {
            return Ok(false);
        };

        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sensor_devices WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_device_id(&self, device_id: &str) -> RepoResult<Option<SensorDevice>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DEVICE_SELECT_SQL} WHERE device_id = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([device_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_device_row(row)?));
        }

        Ok(None)
    }
}

/// Relational keys accept any non-blank text.
fn parse_row_id(id: &str) -> Result<&str, InvalidRecordId> {
    if id.trim().is_empty() {
        return Err(InvalidRecordId::new(id, "id cannot be blank"));
    }
    Ok(id)
}

fn parse_device_row(row: &Row<'_>) -> RepoResult<SensorDevice> {
    let id: String = row.get("id")?;
    if id.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "blank id in sensor_devices.id".to_string(),
        ));
    }

    Ok(SensorDevice {
        id: Some(id),
        device_name: row.get("device_name")?,
        sensor_type: row.get("sensor_type")?,
        location: row.get("location")?,
        status: row.get::<_, Option<String>>("status")?.unwrap_or_default(),
        last_reading: Some(
            row.get::<_, Option<f64>>("last_reading")?
                .unwrap_or(DEFAULT_LAST_READING),
        ),
        unit: row.get::<_, Option<String>>("unit")?.unwrap_or_default(),
        device_id: row.get("device_id")?,
    })
}

fn ensure_device_table(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([DEVICE_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(DEVICE_TABLE));
    }

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: DEVICE_TABLE,
                column,
            });
        }
    }

    Ok(())
}
