//! Sensor device use-case service.
//!
//! # Responsibility
//! - Validate caller input before it reaches a repository.
//! - Delegate persistence to whichever repository was injected.
//!
//! # Invariants
//! - The first failing check aborts the call; nothing is aggregated.
//! - Invalid input never reaches the repository write paths.
//! - Data is passed through unchanged apart from backend id assignment.

use crate::model::device::{RecordId, SensorDevice};
use crate::repo::device_repo::{RepoError, SensorDeviceRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for sensor device use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A required field or id is missing or blank.
    InvalidInput(&'static str),
    /// Target device does not exist.
    NotFound(RecordId),
    /// External `device_id` already belongs to another record.
    DuplicateDeviceId(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound(id) => write!(f, "sensor device not found: {id}"),
            Self::DuplicateDeviceId(device_id) => {
                write!(f, "sensor device with device id `{device_id}` already exists")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Sensor device service facade over a repository implementation.
pub struct SensorDeviceService<R: SensorDeviceRepository> {
    repo: R,
}

impl<R: SensorDeviceRepository> SensorDeviceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a device after required-field and duplicate checks.
    ///
    /// # Contract
    /// - Checks `device_name`, `sensor_type`, `location`, `device_id` in order.
    /// - Rejects a `device_id` that is already stored.
    /// - Returns the stored copy with its backend-assigned id.
    pub fn create_device(&self, device: &SensorDevice) -> ServiceResult<SensorDevice> {
        require_non_blank(&device.device_name, "device name is required")?;
        require_non_blank(&device.sensor_type, "sensor type is required")?;
        require_non_blank(&device.location, "location is required")?;
        require_non_blank(&device.device_id, "device id is required")?;

        if self.repo.find_by_device_id(&device.device_id)?.is_some() {
            warn!("event=device_create module=service status=error error_code=duplicate_device_id");
            return Err(ServiceError::DuplicateDeviceId(device.device_id.clone()));
        }

        let created = self.repo.create(device)?;
        info!(
            "event=device_create module=service status=ok id={}",
            created.id.as_deref().unwrap_or_default()
        );
        Ok(created)
    }

    /// Gets one device by id. Malformed ids yield `None`.
    pub fn get_device(&self, id: &str) -> ServiceResult<Option<SensorDevice>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Gets one device by its external hardware identifier.
    pub fn get_device_by_device_id(&self, device_id: &str) -> ServiceResult<Option<SensorDevice>> {
        Ok(self.repo.find_by_device_id(device_id)?)
    }

    /// Lists every device in backend-defined order.
    pub fn list_devices(&self) -> ServiceResult<Vec<SensorDevice>> {
        Ok(self.repo.find_all()?)
    }

    /// Replaces all fields of an existing device.
    ///
    /// # Contract
    /// - `device.id` must be present and non-blank.
    /// - The target must already exist, otherwise `NotFound`.
    /// - A changed `device_id` must not belong to another record.
    pub fn update_device(&self, device: &SensorDevice) -> ServiceResult<SensorDevice> {
        let Some(id) = device.assigned_id() else {
            return Err(ServiceError::InvalidInput(
                "sensor device id is required for update",
            ));
        };

        let Some(current) = self.repo.find_by_id(id)? else {
            warn!("event=device_update module=service status=error error_code=not_found id={id}");
            return Err(ServiceError::NotFound(id.to_string()));
        };

        if device.device_id != current.device_id {
            if let Some(other) = self.repo.find_by_device_id(&device.device_id)? {
                if other.id != current.id {
                    return Err(ServiceError::DuplicateDeviceId(device.device_id.clone()));
                }
            }
        }

        let updated = self.repo.update(device)?;
        info!("event=device_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Deletes a device by id and reports whether anything was removed.
    pub fn delete_device(&self, id: &str) -> ServiceResult<bool> {
        require_non_blank(id, "sensor device id is required for deletion")?;

        let deleted = self.repo.delete_by_id(id)?;
        info!("event=device_delete module=service status=ok id={id} deleted={deleted}");
        Ok(deleted)
    }

    pub fn device_exists(&self, id: &str) -> ServiceResult<bool> {
        Ok(self.repo.exists_by_id(id)?)
    }
}

fn require_non_blank(value: &str, message: &'static str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(message));
    }
    Ok(())
}
