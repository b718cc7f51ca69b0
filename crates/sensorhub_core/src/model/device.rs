//! Sensor device domain model.
//!
//! # Responsibility
//! - Define the single record managed by SensorHub.
//! - Describe how each backend treats record identifiers.
//!
//! # Invariants
//! - `id` is immutable once a backend has assigned it.
//! - An absent `last_reading` is persisted as `DEFAULT_LAST_READING`.
//! - Required-field checks live in the service layer, not here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reading written by every backend when `last_reading` is absent.
pub const DEFAULT_LAST_READING: f64 = 0.0;

/// Backend-assigned record identifier, kept as text across all backends.
pub type RecordId = String;

/// IoT sensor device record.
///
/// Instances are plain values: repositories take them by reference and hand
/// back fresh copies, never shared state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDevice {
    /// Record identifier. `None` until a backend assigns one.
    pub id: Option<RecordId>,
    /// Human-readable device name. Required.
    pub device_name: String,
    /// Sensor category, e.g. `Temperature`. Required.
    pub sensor_type: String,
    /// Installation site. Required.
    pub location: String,
    /// Free-text operational status.
    pub status: String,
    /// Most recent measurement.
    pub last_reading: Option<f64>,
    /// Measurement unit for `last_reading`.
    pub unit: String,
    /// External hardware identifier, e.g. `SENSOR-001`. Required.
    pub device_id: String,
}

impl SensorDevice {
    /// Creates an unsaved device with no id and no reading.
    pub fn new(
        device_name: impl Into<String>,
        sensor_type: impl Into<String>,
        location: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            device_name: device_name.into(),
            sensor_type: sensor_type.into(),
            location: location.into(),
            status: String::new(),
            last_reading: None,
            unit: String::new(),
            device_id: device_id.into(),
        }
    }

    /// Returns the assigned id, treating blank text as unassigned.
    pub fn assigned_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Reading value as it must be written to storage.
    pub fn reading_for_storage(&self) -> f64 {
        self.last_reading.unwrap_or(DEFAULT_LAST_READING)
    }

    /// Returns a copy carrying `id`.
    pub fn with_id(&self, id: impl Into<RecordId>) -> Self {
        Self {
            id: Some(id.into()),
            ..self.clone()
        }
    }
}

/// How a backend treats identifiers on `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// A non-blank caller id is kept; otherwise a random UUID is generated.
    CallerOrGenerated,
    /// The store always assigns the id; caller ids are dropped.
    StoreAssigned,
}

/// An id string that is not well-formed for a given backend.
///
/// Repositories surface this as "not found" on read/delete/exists paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId {
    pub value: String,
    pub reason: &'static str,
}

impl InvalidRecordId {
    pub fn new(value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

impl Display for InvalidRecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid record id `{}`: {}", self.value, self.reason)
    }
}

impl Error for InvalidRecordId {}
