use chrono::NaiveDate;
use civreg_core::storage::migrations::latest_version;
use civreg_core::{
    open_storage, open_storage_in_memory, BirthFields, BirthPatch, BirthRecord, KeyValueStore,
    MalformedPolicy, MemoryStorage, RecordId, RecordStore, StorageError, StoreError,
};
use rusqlite::Connection;

#[test]
fn sqlite_storage_applies_migrations() {
    let storage = open_storage_in_memory().unwrap();
    assert_eq!(schema_version(storage.connection()), latest_version());
}

#[test]
fn sqlite_storage_round_trips_items() {
    let mut storage = open_storage_in_memory().unwrap();

    assert_eq!(storage.get_item("birthRecords").unwrap(), None);
    storage.set_item("birthRecords", "[]").unwrap();
    storage.set_item("birthRecords", "[1]").unwrap();
    storage.set_item("appSettings", "{}").unwrap();

    assert_eq!(
        storage.get_item("birthRecords").unwrap().as_deref(),
        Some("[1]")
    );
    assert_eq!(
        storage.keys().unwrap(),
        vec!["appSettings".to_string(), "birthRecords".to_string()]
    );

    storage.remove_item("birthRecords").unwrap();
    storage.remove_item("birthRecords").unwrap();
    assert_eq!(storage.get_item("birthRecords").unwrap(), None);
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("civreg.sqlite3");

    let created = {
        let mut store = RecordStore::new(open_storage(&path).unwrap());
        store
            .create::<BirthRecord>(BirthFields::new(
                "Asha",
                "Nair",
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ))
            .unwrap()
    };

    let reopened = RecordStore::new(open_storage(&path).unwrap());
    assert_eq!(reopened.list::<BirthRecord>().unwrap(), vec![created]);
}

#[test]
fn opening_storage_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_storage(&path).unwrap_err() {
        StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_collection_value_reads_as_empty() {
    let store = RecordStore::new(MemoryStorage::with_items([("birthRecords", "  ")]));
    assert!(store.list::<BirthRecord>().unwrap().is_empty());
}

#[test]
fn malformed_collection_is_rejected_by_default() {
    let store = RecordStore::new(MemoryStorage::with_items([("birthRecords", "{not json")]));

    match store.list::<BirthRecord>().unwrap_err() {
        StoreError::MalformedStorage { key, .. } => assert_eq!(key, "birthRecords"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_collection_reads_as_empty_but_is_never_overwritten() {
    let mut store = RecordStore::with_policy(
        MemoryStorage::with_items([("birthRecords", "{not json")]),
        MalformedPolicy::TreatAsEmpty,
    );
    assert!(store.list::<BirthRecord>().unwrap().is_empty());

    let err = store
        .create::<BirthRecord>(BirthFields::new(
            "Asha",
            "Nair",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::MalformedStorage { .. }));
    assert!(matches!(
        store.remove::<BirthRecord>(&RecordId::from("any")),
        Err(StoreError::MalformedStorage { .. })
    ));
    assert!(matches!(
        store.update::<BirthRecord>(&RecordId::from("any"), BirthPatch::default()),
        Err(StoreError::MalformedStorage { .. })
    ));
    assert_eq!(
        store.storage().get_item("birthRecords").unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn migrations_upgrade_a_blank_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.sqlite3");
    Connection::open(&path).unwrap();

    let mut storage = open_storage(&path).unwrap();
    assert_eq!(schema_version(storage.connection()), latest_version());
    storage.set_item("appSettings", "{}").unwrap();
    drop(storage);

    // Reopening at the current version must not recreate or clear the table.
    let storage = open_storage(&path).unwrap();
    assert_eq!(schema_version(storage.connection()), latest_version());
    assert_eq!(
        storage.get_item("appSettings").unwrap().as_deref(),
        Some("{}")
    );
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
