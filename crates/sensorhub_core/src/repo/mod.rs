//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the device persistence contract used by the service layer.
//! - Isolate SQLite and document-store details from business orchestration.
//!
//! # Invariants
//! - Both backends honor the same contract; only id assignment and
//!   `find_all` ordering differ, and `id_policy()` reports the former.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage errors.

pub mod device_repo;
pub mod document_device_repo;
pub mod sqlite_device_repo;
