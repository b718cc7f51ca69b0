use redb::backends::InMemoryBackend;
use redb::{Database, TableDefinition};
use sensorhub_core::db::object_id::ObjectId;
use sensorhub_core::db::{open_document, open_document_in_memory};
use sensorhub_core::{
    DocumentDeviceRepository, IdPolicy, RepoError, SensorDevice, SensorDeviceRepository,
};

const RAW_COLLECTION: TableDefinition<&str, &str> = TableDefinition::new("sensor_devices");

fn sample(name: &str, device_id: &str) -> SensorDevice {
    let mut device = SensorDevice::new(name, "Humidity", "Building B, Room 205", device_id);
    device.status = "Active".to_string();
    device.last_reading = Some(65.0);
    device.unit = "Percent".to_string();
    device
}

#[test]
fn create_assigns_object_id_and_roundtrips_all_fields() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    assert_eq!(repo.id_policy(), IdPolicy::StoreAssigned);

    let device = sample("Humidity Sensor 01", "SENSOR-002");
    let created = repo.create(&device).unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(id.len(), 24);
    assert!(ObjectId::parse(&id).is_ok());

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded, device.with_id(id));
}

#[test]
fn create_ignores_caller_supplied_id() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let created = repo
        .create(&sample("Pinned", "SENSOR-030").with_id("my-own-id"))
        .unwrap();
    let id = created.id.unwrap();
    assert_ne!(id, "my-own-id");
    assert!(repo.exists_by_id(&id).unwrap());
    assert!(!repo.exists_by_id("my-own-id").unwrap());
}

#[test]
fn missing_reading_reads_back_as_zero() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let mut device = sample("No reading yet", "SENSOR-031");
    device.last_reading = None;
    let created = repo.create(&device).unwrap();

    let loaded = repo
        .find_by_id(created.id.as_deref().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.last_reading, Some(0.0));
}

#[test]
fn find_all_returns_every_document_in_insertion_order() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let first = repo.create(&sample("Zeta", "SENSOR-101")).unwrap();
    let second = repo.create(&sample("Alpha", "SENSOR-102")).unwrap();
    let third = repo.create(&sample("Mid", "SENSOR-103")).unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all, vec![first, second, third]);
}

#[test]
fn malformed_ids_are_treated_as_not_found() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    repo.create(&sample("Present", "SENSOR-040")).unwrap();

    for id in ["", "123", "not-a-valid-object-id!!", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
        assert!(repo.find_by_id(id).unwrap().is_none());
        assert!(!repo.exists_by_id(id).unwrap());
        assert!(!repo.delete_by_id(id).unwrap());
    }
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn uppercase_ids_resolve_to_the_same_document() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let created = repo.create(&sample("Case", "SENSOR-041")).unwrap();
    let upper = created.id.as_deref().unwrap().to_uppercase();

    assert_eq!(repo.find_by_id(&upper).unwrap(), Some(created));
    assert!(repo.exists_by_id(&upper).unwrap());
}

#[test]
fn update_replaces_document_atomically() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let created = repo.create(&sample("Humidity Sensor 01", "SENSOR-002")).unwrap();
    let mut changed = created.clone();
    changed.status = "Maintenance".to_string();
    changed.last_reading = Some(70.2);
    changed.location = "Basement".to_string();

    let updated = repo.update(&changed).unwrap();
    assert_eq!(updated, changed);
    assert_eq!(
        repo.find_by_id(created.id.as_deref().unwrap()).unwrap(),
        Some(changed)
    );
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn update_of_unknown_id_fails_without_inserting() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    let existing = repo.create(&sample("Existing", "SENSOR-050")).unwrap();

    let unknown_id = ObjectId::generate().to_hex();
    let ghost = sample("Ghost", "SENSOR-404").with_id(unknown_id.clone());
    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref id) if *id == unknown_id));

    assert!(!repo.exists_by_id(&unknown_id).unwrap());
    assert_eq!(repo.find_all().unwrap(), vec![existing]);
}

#[test]
fn update_with_malformed_or_missing_id_is_not_found() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let malformed = repo
        .update(&sample("Bad id", "SENSOR-051").with_id("bad-id"))
        .unwrap_err();
    assert!(matches!(malformed, RepoError::NotFound(ref id) if id == "bad-id"));

    let missing = repo.update(&sample("No id", "SENSOR-052")).unwrap_err();
    assert!(matches!(missing, RepoError::NotFound(_)));
}

#[test]
fn delete_reports_removal_and_exists_follows() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    let created = repo.create(&sample("Short lived", "SENSOR-060")).unwrap();
    let id = created.id.as_deref().unwrap();
    assert!(repo.exists_by_id(id).unwrap());

    assert!(repo.delete_by_id(id).unwrap());
    assert!(!repo.exists_by_id(id).unwrap());
    assert!(repo.find_by_id(id).unwrap().is_none());
    assert!(!repo.delete_by_id(id).unwrap());
}

#[test]
fn find_by_device_id_scans_collection() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();

    repo.create(&sample("Other", "SENSOR-070")).unwrap();
    let target = repo.create(&sample("Target", "SENSOR-071")).unwrap();

    assert_eq!(repo.find_by_device_id("SENSOR-071").unwrap(), Some(target));
    assert!(repo.find_by_device_id("SENSOR-072").unwrap().is_none());
}

#[test]
fn documents_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensorhub.redb");

    let id = {
        let db = open_document(&path).unwrap();
        let repo = DocumentDeviceRepository::try_new(&db).unwrap();
        repo.create(&sample("Persistent", "SENSOR-080"))
            .unwrap()
            .id
            .unwrap()
    };

    let db = open_document(&path).unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.device_id, "SENSOR-080");
}

#[test]
fn corrupted_document_is_reported_as_invalid_data() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    let id = ObjectId::generate().to_hex();

    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(RAW_COLLECTION).unwrap();
        table.insert(id.as_str(), "{not json").unwrap();
    }
    txn.commit().unwrap();

    assert!(matches!(
        repo.find_by_id(&id),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(repo.find_all(), Err(RepoError::InvalidData(_))));
}

#[test]
fn document_missing_optional_fields_uses_defaults() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    let id = ObjectId::generate().to_hex();

    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(RAW_COLLECTION).unwrap();
        table
            .insert(
                id.as_str(),
                r#"{"deviceName":"Legacy","sensorType":"Gas","location":"Lab","deviceId":"SENSOR-090"}"#,
            )
            .unwrap();
    }
    txn.commit().unwrap();

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.last_reading, Some(0.0));
    assert!(loaded.status.is_empty());
    assert!(loaded.unit.is_empty());
}

#[test]
fn explicit_null_optional_fields_read_as_defaults() {
    let db = open_document_in_memory().unwrap();
    let repo = DocumentDeviceRepository::try_new(&db).unwrap();
    let present = repo.create(&sample("Present", "SENSOR-091")).unwrap();
    let id = ObjectId::generate().to_hex();

    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(RAW_COLLECTION).unwrap();
        table
            .insert(
                id.as_str(),
                r#"{"deviceName":"Nulls","sensorType":"Gas","location":"Lab","status":null,"lastReading":null,"unit":null,"deviceId":"SENSOR-092"}"#,
            )
            .unwrap();
    }
    txn.commit().unwrap();

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert!(loaded.status.is_empty());
    assert!(loaded.unit.is_empty());
    assert_eq!(loaded.last_reading, Some(0.0));

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&present));
    assert_eq!(repo.find_by_device_id("SENSOR-092").unwrap(), Some(loaded));
}

#[test]
fn repository_rejects_database_without_collection() {
    let db = Database::builder()
        .create_with_backend(InMemoryBackend::new())
        .unwrap();

    let result = DocumentDeviceRepository::try_new(&db);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("sensor_devices"))
    ));
}
