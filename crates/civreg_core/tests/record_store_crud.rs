use chrono::{NaiveDate, Utc};
use civreg_core::{
    BirthFields, BirthPatch, BirthRecord, DeathFields, DeathPatch, DeathRecord, KeyValueStore,
    MemoryStorage, RecordId, RecordStore, RecordValidationError, StoreError,
};

#[test]
fn create_then_list_returns_record_with_fresh_id() {
    let mut store = RecordStore::new(MemoryStorage::new());

    let created = store.create::<BirthRecord>(asha()).unwrap();
    let listed = store.list::<BirthRecord>().unwrap();

    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(created.fields, asha());
    assert!(!created.id.as_str().is_empty());
}

#[test]
fn registration_date_is_never_before_the_call() {
    let mut store = RecordStore::new(MemoryStorage::new());

    for _ in 0..200 {
        let before = Utc::now();
        let created = store.create::<BirthRecord>(asha()).unwrap();
        let after = Utc::now() + chrono::Duration::milliseconds(1);
        assert!(created.registration_date >= before);
        assert!(created.registration_date <= after);
    }

    // Millisecond precision means the stored copy equals the returned one.
    let listed = store.list::<BirthRecord>().unwrap();
    assert_eq!(listed.len(), 200);
    let last = listed.last().unwrap();
    assert_eq!(last.registration_date.timestamp_subsec_nanos() % 1_000_000, 0);
}

#[test]
fn created_ids_are_unique_and_order_is_preserved() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let first = store.create::<BirthRecord>(asha()).unwrap();
    let second = store
        .create::<BirthRecord>(BirthFields::new("Meera", "Pillai", date(2024, 2, 1)))
        .unwrap();

    assert_ne!(first.id, second.id);
    let ids = store
        .list::<BirthRecord>()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn collections_are_independent() {
    let mut store = RecordStore::new(MemoryStorage::new());
    store.create::<BirthRecord>(asha()).unwrap();

    assert!(store.list::<DeathRecord>().unwrap().is_empty());
    assert!(store.storage().get_item("deathRecords").unwrap().is_none());
    assert!(store.storage().get_item("birthRecords").unwrap().is_some());
}

#[test]
fn update_overlays_patch_and_leaves_other_records_alone() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let target = store.create::<BirthRecord>(asha()).unwrap();
    let other = store
        .create::<BirthRecord>(BirthFields::new("Meera", "Pillai", date(2024, 2, 1)))
        .unwrap();

    let patch = BirthPatch {
        middle_name: Some("K".to_string()),
        birth_weight: Some("3.1".to_string()),
        ..BirthPatch::default()
    };
    let updated = store.update::<BirthRecord>(&target.id, patch).unwrap();

    let mut expected = target.clone();
    expected.fields.middle_name = "K".to_string();
    expected.fields.birth_weight = "3.1".to_string();
    assert_eq!(updated, expected);
    assert_eq!(store.list::<BirthRecord>().unwrap(), vec![expected, other]);
}

#[test]
fn update_on_missing_id_inserts_nothing() {
    let mut store = RecordStore::new(MemoryStorage::new());
    store.create::<BirthRecord>(asha()).unwrap();
    let raw_before = store.storage().get_item("birthRecords").unwrap();

    let err = store
        .update::<BirthRecord>(&RecordId::from("does-not-exist"), BirthPatch::default())
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.list::<BirthRecord>().unwrap().len(), 1);
    assert_eq!(store.storage().get_item("birthRecords").unwrap(), raw_before);
}

#[test]
fn update_cannot_blank_required_names() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let created = store.create::<BirthRecord>(asha()).unwrap();

    let patch = BirthPatch {
        last_name: Some("  ".to_string()),
        ..BirthPatch::default()
    };
    let err = store.update::<BirthRecord>(&created.id, patch).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::MissingField(_))
    ));
    assert_eq!(store.list::<BirthRecord>().unwrap(), vec![created]);
}

#[test]
fn remove_deletes_only_the_target() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let first = store.create::<DeathRecord>(ravi("male")).unwrap();
    let second = store.create::<DeathRecord>(ravi("female")).unwrap();

    assert!(store.remove::<DeathRecord>(&first.id).unwrap());
    assert_eq!(store.list::<DeathRecord>().unwrap(), vec![second]);
    assert!(store.get::<DeathRecord>(&first.id).unwrap().is_none());
}

#[test]
fn remove_missing_id_reports_no_removal_and_writes_nothing() {
    let mut store = RecordStore::new(MemoryStorage::new());

    assert!(!store
        .remove::<DeathRecord>(&RecordId::from("missing"))
        .unwrap());
    assert!(store.storage().get_item("deathRecords").unwrap().is_none());
}

#[test]
fn death_before_birth_is_rejected_on_create_and_update() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let mut fields = ravi("male");
    fields.date_of_death = Some(date(1940, 1, 1));

    let err = store.create::<DeathRecord>(fields).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::DeathBeforeBirth { .. })
    ));
    assert!(store.list::<DeathRecord>().unwrap().is_empty());

    let created = store.create::<DeathRecord>(ravi("male")).unwrap();
    let patch = DeathPatch {
        date_of_birth: Some(date(2030, 1, 1)),
        ..DeathPatch::default()
    };
    assert!(store.update::<DeathRecord>(&created.id, patch).is_err());
}

#[test]
fn legacy_timestamp_ids_stay_addressable() {
    let raw = r#"[{"id":"1704450000000","firstName":"Asha","lastName":"Nair","dateOfBirth":"2024-01-05","registrationDate":"2024-01-05T10:00:00.000Z"}]"#;
    let mut store = RecordStore::new(MemoryStorage::with_items([("birthRecords", raw)]));

    let id = RecordId::from("1704450000000");
    assert!(store.get::<BirthRecord>(&id).unwrap().is_some());
    let patch = BirthPatch {
        gender: Some("female".to_string()),
        ..BirthPatch::default()
    };
    assert_eq!(
        store.update::<BirthRecord>(&id, patch).unwrap().fields.gender,
        "female"
    );
}

fn asha() -> BirthFields {
    let mut fields = BirthFields::new("Asha", "Nair", date(2024, 1, 5));
    fields.gender = "female".to_string();
    fields.father_name = "Ravi Nair".to_string();
    fields
}

fn ravi(gender: &str) -> DeathFields {
    let mut fields = DeathFields::new("Ravi", "Menon", date(1950, 6, 1), date(2024, 2, 10));
    fields.gender = gender.to_string();
    fields
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
