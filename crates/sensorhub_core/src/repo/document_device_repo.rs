//! Document-store implementation of the device repository.
//!
//! # Responsibility
//! - Store each device as one JSON document in the redb `sensor_devices` collection.
//! - Assign ObjectIds at insert time.
//!
//! # Invariants
//! - Caller-supplied ids are ignored on `create`.
//! - `update` and `delete_by_id` run inside a single write transaction.
//! - Documents use camelCase field names (`deviceName`, `lastReading`, ...).

use crate::db::object_id::ObjectId;
use crate::db::{DEVICE_COLLECTION, DEVICE_TABLE};
use crate::model::device::{IdPolicy, SensorDevice};
use crate::repo::device_repo::{RepoError, RepoResult, SensorDeviceRepository};
use log::{debug, warn};
use redb::{Database, ReadableTable, TableError};
use serde::{Deserialize, Deserializer, Serialize};

/// Persisted document body. The id lives in the table key, not here.
///
/// Optional fields tolerate both a missing key and an explicit `null`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceDocument {
    device_name: String,
    sensor_type: String,
    location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    last_reading: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    unit: String,
    device_id: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeviceDocument {
    fn from_device(device: &SensorDevice) -> Self {
        Self {
            device_name: device.device_name.clone(),
            sensor_type: device.sensor_type.clone(),
            location: device.location.clone(),
            status: device.status.clone(),
            last_reading: device.reading_for_storage(),
            unit: device.unit.clone(),
            device_id: device.device_id.clone(),
        }
    }

    fn into_device(self, id: ObjectId) -> SensorDevice {
        SensorDevice {
            id: Some(id.to_hex()),
            device_name: self.device_name,
            sensor_type: self.sensor_type,
            location: self.location,
            status: self.status,
            last_reading: Some(self.last_reading),
            unit: self.unit,
            device_id: self.device_id,
        }
    }
}

/// redb-backed device repository borrowing the process database.
pub struct DocumentDeviceRepository<'db> {
    db: &'db Database,
}

impl<'db> DocumentDeviceRepository<'db> {
    /// Creates a repository after checking the collection exists.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the database was not bootstrapped.
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        let txn = db.begin_read()?;
        match txn.open_table(DEVICE_COLLECTION) {
            Ok(_) => Ok(Self { db }),
            Err(TableError::TableDoesNotExist(_)) => {
                Err(RepoError::MissingRequiredTable(DEVICE_TABLE))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl SensorDeviceRepository for DocumentDeviceRepository<'_> {
    fn id_policy(&self) -> IdPolicy {
        IdPolicy::StoreAssigned
    }

    fn create(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        if let Some(ignored) = device.assigned_id() {
            warn!(
                "event=device_create module=repo status=id_ignored backend=document ignored_id={ignored}"
            );
        }

        let id = ObjectId::generate();
        let key = id.to_hex();
        let body = encode_document(device)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DEVICE_COLLECTION)?;
            table.insert(key.as_str(), body.as_str())?;
        }
        txn.commit()?;

        Ok(device.with_id(key))
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<SensorDevice>> {
        let key = match ObjectId::parse(id) {
            Ok(key) => key,
            Err(err) => {
                debug!("event=device_lookup module=repo status=skip backend=document reason={err}");
                return Ok(None);
            }
        };

        let txn = self.db.begin_read()?;
        let table = txn.open_table(DEVICE_COLLECTION)?;
        let found = table.get(key.to_hex().as_str())?;
        found.map(|body| decode_document(key, body.value())).transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<SensorDevice>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DEVICE_COLLECTION)?;
        let mut devices = Vec::new();

        for entry in table.iter()? {
            let (key, body) = entry?;
            let id = parse_stored_key(key.value())?;
            devices.push(decode_document(id, body.value())?);
        }

        Ok(devices)
    }

    fn update(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        let requested = device.id.clone().unwrap_or_default();
        let Ok(id) = ObjectId::parse(requested.as_str()) else {
            return Err(RepoError::NotFound(requested));
        };
        let key = id.to_hex();
        let body = encode_document(device)?;

        let txn = self.db.begin_write()?;
        let replaced = {
            let mut table = txn.open_table(DEVICE_COLLECTION)?;
            let exists = table.get(key.as_str())?.is_some();
            if exists {
                table.insert(key.as_str(), body.as_str())?;
            }
            exists
        };

        if !replaced {
            txn.abort()?;
            return Err(RepoError::NotFound(key));
        }
        txn.commit()?;

        Ok(device.with_id(key))
    }

    fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        let Ok(id) = ObjectId::parse(id) else {
            return Ok(false);
        };
        let key = id.to_hex();

        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(DEVICE_COLLECTION)?;
            let previous = table.remove(key.as_str())?;
            previous.is_some()
        };
        txn.commit()?;

        Ok(removed)
    }

    fn exists_by_id(&self, id: &str) -> RepoResult<bool> {
        let Ok(id) = ObjectId::parse(id) else {
            return Ok(false);
        };

        let txn = self.db.begin_read()?;
        let table = txn.open_table(DEVICE_COLLECTION)?;
        let exists = table.get(id.to_hex().as_str())?.is_some();
        Ok(exists)
    }

    fn find_by_device_id(&self, device_id: &str) -> RepoResult<Option<SensorDevice>> {
        Ok(self
            .find_all()?
            .into_iter()
            .find(|device| device.device_id == device_id))
    }
}

fn encode_document(device: &SensorDevice) -> RepoResult<String> {
    serde_json::to_string(&DeviceDocument::from_device(device))
        .map_err(|err| RepoError::InvalidData(format!("failed to encode device document: {err}")))
}

fn decode_document(id: ObjectId, body: &str) -> RepoResult<SensorDevice> {
    let document: DeviceDocument = serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!("invalid document `{id}` in {DEVICE_TABLE}: {err}"))
    })?;
    Ok(document.into_device(id))
}

fn parse_stored_key(key: &str) -> RepoResult<ObjectId> {
    ObjectId::parse(key).map_err(|err| {
        RepoError::InvalidData(format!("invalid key in {DEVICE_TABLE}: {err}"))
    })
}
