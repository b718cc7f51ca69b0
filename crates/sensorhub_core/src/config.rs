//! Static process configuration.
//!
//! # Responsibility
//! - Hold the compile-time settings for store selection and file locations.
//!
//! # Invariants
//! - Nothing here reads CLI flags or environment variables.
//! - All resolved paths are absolute.

use std::path::PathBuf;

/// Backend used by the CLI entry point.
pub const ACTIVE_BACKEND: StoreBackend = StoreBackend::Relational;

/// Directory name created under the system temp dir for all store files.
pub const DATA_DIR_NAME: &str = "sensorhub";
/// SQLite database file name.
pub const RELATIONAL_DB_FILE: &str = "sensorhub.sqlite3";
/// redb document store file name.
pub const DOCUMENT_DB_FILE: &str = "sensorhub.redb";
/// Log directory name under the data dir.
pub const LOG_DIR_NAME: &str = "logs";

/// Persistence backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Row-oriented SQLite table.
    Relational,
    /// Embedded document collection.
    Document,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::Document => "document",
        }
    }
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Builds the configuration from the compile-time constants.
    pub fn from_static() -> Self {
        Self {
            backend: ACTIVE_BACKEND,
            data_dir: std::env::temp_dir().join(DATA_DIR_NAME),
        }
    }

    /// Same locations, different backend.
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn relational_path(&self) -> PathBuf {
        self.data_dir.join(RELATIONAL_DB_FILE)
    }

    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_DB_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}
