//! Cross-collection activity feeds.
//!
//! # Invariants
//! - Feeds are ordered by `registration_date` descending; equal timestamps
//!   keep input order (births before deaths when fed from `list_all`).
//! - Date filters compare UTC calendar dates.

use crate::model::record::{join_name, AnyRecord, RecordId, RecordKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Dashboard default for `recent_activity`.
pub const DEFAULT_RECENT_LIMIT: usize = 5;
/// Default length of the notification feed.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: RecordKind,
    pub id: RecordId,
    pub name: String,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: RecordKind,
    pub id: RecordId,
    pub message: String,
    pub registration_date: DateTime<Utc>,
}

/// Newest registrations first, optionally restricted to one day.
pub fn recent_activity(
    records: Vec<AnyRecord>,
    on: Option<NaiveDate>,
    limit: usize,
) -> Vec<ActivityEntry> {
    newest_first(records)
        .into_iter()
        .filter(|record| on.map_or(true, |day| record.registration_date().date_naive() == day))
        .take(limit)
        .map(|record| ActivityEntry {
            kind: record.kind(),
            id: record.id().clone(),
            name: short_name(&record),
            registration_date: record.registration_date(),
        })
        .collect()
}

/// `"New birth registration: Asha Nair"` style messages, newest first.
pub fn notifications(records: Vec<AnyRecord>, limit: usize) -> Vec<Notification> {
    newest_first(records)
        .into_iter()
        .take(limit)
        .map(|record| Notification {
            kind: record.kind(),
            id: record.id().clone(),
            message: format!(
                "New {} registration: {}",
                record.kind(),
                short_name(&record)
            ),
            registration_date: record.registration_date(),
        })
        .collect()
}

fn newest_first(mut records: Vec<AnyRecord>) -> Vec<AnyRecord> {
    records.sort_by(|left, right| right.registration_date().cmp(&left.registration_date()));
    records
}

fn short_name(record: &AnyRecord) -> String {
    join_name(&[record.first_name(), record.last_name()])
}

#[cfg(test)]
mod tests {
    use super::{notifications, recent_activity};
    use crate::model::birth::{BirthFields, BirthRecord};
    use crate::model::death::{DeathFields, DeathRecord};
    use crate::model::record::{AnyRecord, Record, RecordId, RecordKind};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn birth(id: &str, first: &str, registered: DateTime<Utc>) -> AnyRecord {
        BirthRecord::from_parts(
            RecordId::from(id),
            registered,
            BirthFields::new(first, "Nair", date(2024, 1, 5)),
        )
        .into_any()
    }

    fn death(id: &str, first: &str, registered: DateTime<Utc>) -> AnyRecord {
        DeathRecord::from_parts(
            RecordId::from(id),
            registered,
            DeathFields::new(first, "Menon", date(1950, 1, 1), date(2024, 2, 1)),
        )
        .into_any()
    }

    #[test]
    fn recent_activity_orders_newest_first_and_truncates() {
        let records = vec![
            birth("b1", "Asha", at(1, 9)),
            birth("b2", "Meera", at(3, 9)),
            death("d1", "Ravi", at(2, 9)),
        ];

        let feed = recent_activity(records, None, 2);
        let ids = feed.iter().map(|entry| entry.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["b2", "d1"]);
        assert_eq!(feed[1].kind, RecordKind::Death);
        assert_eq!(feed[1].name, "Ravi Menon");
    }

    #[test]
    fn recent_activity_filters_by_registration_day() {
        let records = vec![
            birth("b1", "Asha", at(1, 9)),
            death("d1", "Ravi", at(2, 23)),
            birth("b2", "Meera", at(2, 1)),
        ];

        let feed = recent_activity(records, Some(date(2024, 3, 2)), 5);
        let ids = feed.iter().map(|entry| entry.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["d1", "b2"]);
    }

    #[test]
    fn notifications_name_kind_and_person() {
        let records = vec![birth("b1", "Asha", at(1, 9)), death("d1", "Ravi", at(2, 9))];

        let feed = notifications(records, 10);
        assert_eq!(feed[0].message, "New death registration: Ravi Menon");
        assert_eq!(feed[1].message, "New birth registration: Asha Nair");
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let records = vec![birth("b1", "Asha", at(1, 9)), death("d1", "Ravi", at(1, 9))];
        let feed = notifications(records, 10);
        assert_eq!(feed[0].id.as_str(), "b1");
    }
}
