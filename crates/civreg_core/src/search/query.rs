//! Query normalization and matching.
//!
//! # Invariants
//! - Matching is an OR across searchable fields, never an AND.
//! - An empty query matches every record in a listing filter and nothing in
//!   a profile search.
//! - Query and field values are normalized identically: trimmed, inner
//!   whitespace collapsed to one space, lowercased.

use crate::model::record::{AnyRecord, Record};
use once_cell::sync::Lazy;
use regex::Regex;

/// Hits shown by the global profile search unless a caller asks otherwise.
pub const DEFAULT_PROFILE_LIMIT: usize = 5;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalized search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            needle: normalize(text.as_ref()),
        }
    }

    /// Normalized form the query is matched with.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Returns whether any searchable field of `record` contains the query.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        record
            .searchable_fields()
            .iter()
            .any(|field| self.contained_in(field))
    }

    /// Global-search match: first name, last name, or a fragment of the id.
    /// A blank query matches nothing.
    ///
    /// Ids are matched verbatim (only trimmed) so numeric legacy ids and
    /// UUIDs can be pasted in directly.
    pub fn matches_profile(&self, record: &AnyRecord) -> bool {
        if self.is_empty() {
            return false;
        }
        self.contained_in(record.first_name())
            || self.contained_in(record.last_name())
            || record.id().as_str().to_lowercase().contains(&self.needle)
    }

    fn contained_in(&self, value: &str) -> bool {
        normalize(value).contains(&self.needle)
    }
}

/// Filters `records` down to query matches, preserving order.
pub fn filter_records<R: Record>(records: Vec<R>, query: &SearchQuery) -> Vec<R> {
    records
        .into_iter()
        .filter(|record| query.matches(record))
        .collect()
}

fn normalize(value: &str) -> String {
    WHITESPACE_RE
        .replace_all(value.trim(), " ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize, SearchQuery};
    use crate::model::birth::{BirthFields, BirthRecord};
    use crate::model::record::{Record, RecordId};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Asha \t  NAIR\n"), "asha nair");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn blank_query_is_empty() {
        assert!(SearchQuery::new("   ").is_empty());
        assert_eq!(SearchQuery::new(" Nair ").needle(), "nair");
    }

    #[test]
    fn blank_query_lists_everything_but_profiles_nothing() {
        let dob = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let fields = BirthFields::new("Asha", "Nair", dob);
        let record = BirthRecord::from_parts(RecordId::from("42"), Utc::now(), fields);
        let blank = SearchQuery::new("  ");

        assert!(blank.matches(&record));
        assert!(!blank.matches_profile(&record.clone().into_any()));
        assert!(SearchQuery::new("42").matches_profile(&record.into_any()));
    }
}
