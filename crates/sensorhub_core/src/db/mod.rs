//! Storage bootstrap for both SensorHub backends.
//!
//! # Responsibility
//! - Open and configure the SQLite connection or the redb document database.
//! - Own the process-wide store handle from startup to shutdown.
//!
//! # Invariants
//! - Core code must not touch device data before the schema/collection exists.
//! - Exactly one store is open per `Store` value; closing consumes it.

use crate::config::{StoreBackend, StoreConfig};
use log::{error, info};
use redb::TableDefinition;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod object_id;
mod open;
pub mod schema;

pub use open::{open_document, open_document_in_memory, open_relational, open_relational_in_memory};

/// Relational table and document collection name.
pub const DEVICE_TABLE: &str = "sensor_devices";

/// Document collection: ObjectId text -> JSON document.
pub(crate) const DEVICE_COLLECTION: TableDefinition<&str, &str> =
    TableDefinition::new(DEVICE_TABLE);

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Redb(redb::Error),
    Io(std::io::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Redb(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Redb(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<redb::Error> for DbError {
    fn from(value: redb::Error) -> Self {
        Self::Redb(value)
    }
}

impl From<redb::DatabaseError> for DbError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::TransactionError> for DbError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::TableError> for DbError {
    fn from(value: redb::TableError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::StorageError> for DbError {
    fn from(value: redb::StorageError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::CommitError> for DbError {
    fn from(value: redb::CommitError) -> Self {
        Self::Redb(value.into())
    }
}

/// The single long-lived store handle held by the entry point.
pub enum Store {
    Relational(Connection),
    Document(redb::Database),
}

impl Store {
    /// Opens the store selected by `config`, creating its data dir if needed.
    ///
    /// # Side effects
    /// - Creates `config.data_dir`.
    /// - Emits `db_open` logging events.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        match config.backend {
            StoreBackend::Relational => open_relational(config.relational_path()).map(Self::Relational),
            StoreBackend::Document => open_document(config.document_path()).map(Self::Document),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Relational(_) => StoreBackend::Relational,
            Self::Document(_) => StoreBackend::Document,
        }
    }

    /// Releases the underlying connection or database.
    pub fn close(self) -> DbResult<()> {
        let backend = self.backend();
        let result = match self {
            Self::Relational(conn) => conn.close().map_err(|(_, err)| DbError::from(err)),
            Self::Document(db) => {
                drop(db);
                Ok(())
            }
        };

        match &result {
            Ok(()) => info!(
                "event=db_close module=db status=ok backend={}",
                backend.as_str()
            ),
            Err(err) => error!(
                "event=db_close module=db status=error backend={} error={}",
                backend.as_str(),
                err
            ),
        }
        result
    }
}
