use chrono::NaiveDate;
use civreg_core::stats::summary::{summarize_births, summarize_deaths};
use civreg_core::{
    summarize, BirthFields, BirthRecord, BirthStats, DeathFields, DeathRecord, DeathStats,
    MemoryStorage, RecordStore,
};

#[test]
fn single_female_birth_summary() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let mut fields = BirthFields::new("Asha", "Nair", date(2024, 1, 5));
    fields.gender = "female".to_string();
    store.create::<BirthRecord>(fields).unwrap();

    let births = store.list::<BirthRecord>().unwrap();
    assert_eq!(
        summarize(&births),
        BirthStats {
            male: 0,
            female: 1,
            total: 1
        }
    );
}

#[test]
fn death_summary_buckets_unrecognized_gender_as_other() {
    let mut store = RecordStore::new(MemoryStorage::new());
    for gender in ["female", "unspecified"] {
        let mut fields = DeathFields::new("Ravi", "Menon", date(1950, 6, 1), date(2024, 2, 10));
        fields.gender = gender.to_string();
        store.create::<DeathRecord>(fields).unwrap();
    }

    let deaths = store.list::<DeathRecord>().unwrap();
    assert_eq!(
        summarize_deaths(&deaths),
        DeathStats {
            male: 0,
            female: 1,
            other: 1,
            total: 2
        }
    );
}

#[test]
fn birth_summary_drops_unrecognized_and_ignores_case() {
    let mut store = RecordStore::new(MemoryStorage::new());
    for gender in ["Male", " male ", "FEMALE", "other", ""] {
        let mut fields = BirthFields::new("Baby", "Doe", date(2024, 1, 5));
        fields.gender = gender.to_string();
        store.create::<BirthRecord>(fields).unwrap();
    }

    let births = store.list::<BirthRecord>().unwrap();
    let stats = summarize_births(&births);
    assert_eq!(
        stats,
        BirthStats {
            male: 2,
            female: 1,
            total: 3
        }
    );
    assert!(stats.total < births.len() as u32);
}

#[test]
fn empty_collections_summarize_to_zero() {
    assert_eq!(summarize_births(&[]), BirthStats::default());
    assert_eq!(summarize_deaths(&[]), DeathStats::default());
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
