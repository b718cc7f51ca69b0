//! Sensor device repository contract.
//!
//! # Responsibility
//! - Define the CRUD capability shared by every storage backend.
//! - Define the repository error surface used by the service layer.
//!
//! # Invariants
//! - Malformed ids are "not found" on read, delete and exists paths.
//! - `update` never mutates the store when the target id is unknown.
//! - Absent `last_reading` values are written as `0.0`.

use crate::db::DbError;
use crate::model::device::{IdPolicy, RecordId, SensorDevice};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for device persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage fault from the underlying driver. Not retried.
    Db(DbError),
    /// Update target does not exist.
    NotFound(RecordId),
    /// Persisted record cannot be decoded into a `SensorDevice`.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage error: {err}"),
            Self::NotFound(id) => write!(f, "sensor device not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted device data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<redb::TransactionError> for RepoError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Db(value.into())
    }
}

impl From<redb::TableError> for RepoError {
    fn from(value: redb::TableError) -> Self {
        Self::Db(value.into())
    }
}

impl From<redb::StorageError> for RepoError {
    fn from(value: redb::StorageError) -> Self {
        Self::Db(value.into())
    }
}

impl From<redb::CommitError> for RepoError {
    fn from(value: redb::CommitError) -> Self {
        Self::Db(value.into())
    }
}

/// Persistence capability for sensor devices.
///
/// Implementations block until the store responds.
pub trait SensorDeviceRepository {
    /// How this backend assigns ids on `create`.
    fn id_policy(&self) -> IdPolicy;
    /// Persists a new device and returns it with `id` populated.
    fn create(&self, device: &SensorDevice) -> RepoResult<SensorDevice>;
    fn find_by_id(&self, id: &str) -> RepoResult<Option<SensorDevice>>;
    /// Returns every device in backend-defined order.
    fn find_all(&self) -> RepoResult<Vec<SensorDevice>>;
    /// Replaces every field except `id`. Fails with `NotFound` for unknown ids.
    fn update(&self, device: &SensorDevice) -> RepoResult<SensorDevice>;
    /// Returns whether a record was removed.
    fn delete_by_id(&self, id: &str) -> RepoResult<bool>;
    fn exists_by_id(&self, id: &str) -> RepoResult<bool>;
    /// Looks up a device by its external hardware identifier.
    fn find_by_device_id(&self, device_id: &str) -> RepoResult<Option<SensorDevice>>;
}

impl<R: SensorDeviceRepository + ?Sized> SensorDeviceRepository for &R {
    fn id_policy(&self) -> IdPolicy {
        (**self).id_policy()
    }

    fn create(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        (**self).create(device)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<SensorDevice>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<SensorDevice>> {
        (**self).find_all()
    }

    fn update(&self, device: &SensorDevice) -> RepoResult<SensorDevice> {
        (**self).update(device)
    }

    fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        (**self).delete_by_id(id)
    }

    fn exists_by_id(&self, id: &str) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn find_by_device_id(&self, device_id: &str) -> RepoResult<Option<SensorDevice>> {
        (**self).find_by_device_id(device_id)
    }
}
