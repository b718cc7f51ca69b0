//! CRUD walkthrough shared by the CLI and integration tests.
//!
//! # Responsibility
//! - Drive one create/list/get/update/delete sequence through the service.
//! - Capture every intermediate result for display or assertions.
//!
//! # Invariants
//! - Only the service API is used, so the sequence is backend-agnostic.

use crate::model::device::{IdPolicy, SensorDevice};
use crate::repo::device_repo::SensorDeviceRepository;
use crate::service::device_service::{SensorDeviceService, ServiceError, ServiceResult};
use log::info;
use std::time::Instant;

/// Reading applied to the first device by the update step.
pub const DEMO_UPDATED_READING: f64 = 26.8;
/// Status applied to the first device by the update step.
pub const DEMO_UPDATED_STATUS: &str = "Maintenance";

/// Results captured at each step of `run_crud_demo`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub id_policy: IdPolicy,
    /// Sample devices left over from an earlier run and removed first.
    pub cleared: usize,
    /// Devices as returned by `create_device`, in creation order.
    pub created: Vec<SensorDevice>,
    /// `list_devices` right after both creates.
    pub listed: Vec<SensorDevice>,
    /// First device fetched back by id.
    pub fetched: Option<SensorDevice>,
    pub updated: SensorDevice,
    /// Whether deleting the second device removed a record.
    pub deleted: bool,
    /// `list_devices` after the delete.
    pub remaining: Vec<SensorDevice>,
}

/// The two sample devices used by the walkthrough.
pub fn demo_devices() -> [SensorDevice; 2] {
    let mut temperature = SensorDevice::new(
        "Temperature Sensor 01",
        "Temperature",
        "Building A, Room 101",
        "SENSOR-001",
    );
    temperature.status = "Active".to_string();
    temperature.last_reading = Some(25.5);
    temperature.unit = "Celsius".to_string();

    let mut humidity = SensorDevice::new(
        "Humidity Sensor 01",
        "Humidity",
        "Building B, Room 205",
        "SENSOR-002",
    );
    humidity.status = "Active".to_string();
    humidity.last_reading = Some(65.0);
    humidity.unit = "Percent".to_string();

    [temperature, humidity]
}

/// Runs the create/list/get/update/delete walkthrough.
///
/// # Side effects
/// - Removes sample devices left by a previous run before creating new ones.
/// - Leaves the first sample device in the store.
/// - Emits `demo_run` logging events.
pub fn run_crud_demo<R: SensorDeviceRepository>(
    service: &SensorDeviceService<R>,
) -> ServiceResult<DemoReport> {
    let started_at = Instant::now();
    let id_policy = service.repository().id_policy();
    info!("event=demo_run module=demo status=start id_policy={id_policy:?}");

    let cleared = clear_previous_run(service)?;

    let [first, second] = demo_devices();
    let first = service.create_device(&first)?;
    let second = service.create_device(&second)?;

    let listed = service.list_devices()?;

    let first_id = created_id(&first)?;
    let fetched = service.get_device(first_id)?;

    let mut changed = first.clone();
    changed.last_reading = Some(DEMO_UPDATED_READING);
    changed.status = DEMO_UPDATED_STATUS.to_string();
    let updated = service.update_device(&changed)?;

    let deleted = service.delete_device(created_id(&second)?)?;
    let remaining = service.list_devices()?;

    info!(
        "event=demo_run module=demo status=ok duration_ms={} remaining={}",
        started_at.elapsed().as_millis(),
        remaining.len()
    );

    Ok(DemoReport {
        id_policy,
        cleared,
        created: vec![first, second],
        listed,
        fetched,
        updated,
        deleted,
        remaining,
    })
}

fn clear_previous_run<R: SensorDeviceRepository>(
    service: &SensorDeviceService<R>,
) -> ServiceResult<usize> {
    let mut cleared = 0;
    for sample in demo_devices() {
        if let Some(existing) = service.get_device_by_device_id(&sample.device_id)? {
            if service.delete_device(created_id(&existing)?)? {
                cleared += 1;
            }
        }
    }
    Ok(cleared)
}

fn created_id(device: &SensorDevice) -> ServiceResult<&str> {
    device
        .assigned_id()
        .ok_or(ServiceError::InvalidInput("created device has no id"))
}
