//! Domain model for sensor device records.
//!
//! # Responsibility
//! - Define the value types exchanged between service and repositories.
//!
//! # Invariants
//! - Model types carry no storage handles; they are copied across layers.

pub mod device;
