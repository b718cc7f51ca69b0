//! Core domain logic for SensorHub.
//! Sensor device CRUD over interchangeable relational and document stores.

pub mod config;
pub mod db;
pub mod demo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{StoreBackend, StoreConfig};
pub use db::{DbError, DbResult, Store};
pub use demo::{run_crud_demo, DemoReport};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::device::{IdPolicy, InvalidRecordId, RecordId, SensorDevice};
pub use repo::device_repo::{RepoError, RepoResult, SensorDeviceRepository};
pub use repo::document_device_repo::DocumentDeviceRepository;
pub use repo::sqlite_device_repo::SqliteDeviceRepository;
pub use service::device_service::{SensorDeviceService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
