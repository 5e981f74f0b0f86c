//! Gender breakdowns per record kind.
//!
//! # Invariants
//! - Birth `total` counts only male and female records. Records with any
//!   other gender are dropped from the birth summary entirely, so `total`
//!   can be lower than the collection length.
//! - Death `total` equals the collection length: unrecognized or missing
//!   genders fall into `other`.

use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use crate::model::record::Record;
use serde::Serialize;

/// Tally buckets a stored gender value can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderBucket {
    Male,
    Female,
    Unrecognized,
}

impl GenderBucket {
    /// Classifies a free-form gender value, ignoring case and surrounding
    /// whitespace.
    pub fn classify(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("male") {
            Self::Male
        } else if value.eq_ignore_ascii_case("female") {
            Self::Female
        } else {
            Self::Unrecognized
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BirthStats {
    pub male: u32,
    pub female: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeathStats {
    pub male: u32,
    pub female: u32,
    pub other: u32,
    pub total: u32,
}

/// Record kinds that have a statistics summary.
pub trait Summarize: Record {
    type Stats;

    fn summarize(records: &[Self]) -> Self::Stats;
}

impl Summarize for BirthRecord {
    type Stats = BirthStats;

    fn summarize(records: &[Self]) -> BirthStats {
        let mut stats = BirthStats::default();
        for record in records {
            match GenderBucket::classify(record.gender()) {
                GenderBucket::Male => stats.male += 1,
                GenderBucket::Female => stats.female += 1,
                GenderBucket::Unrecognized => {}
            }
        }
        stats.total = stats.male + stats.female;
        stats
    }
}

impl Summarize for DeathRecord {
    type Stats = DeathStats;

    fn summarize(records: &[Self]) -> DeathStats {
        let mut stats = DeathStats::default();
        for record in records {
            match GenderBucket::classify(record.gender()) {
                GenderBucket::Male => stats.male += 1,
                GenderBucket::Female => stats.female += 1,
                GenderBucket::Unrecognized => stats.other += 1,
            }
        }
        stats.total = stats.male + stats.female + stats.other;
        stats
    }
}

/// Summarizes a snapshot of any kind that supports it.
pub fn summarize<R: Summarize>(records: &[R]) -> R::Stats {
    R::summarize(records)
}

pub fn summarize_births(records: &[BirthRecord]) -> BirthStats {
    summarize(records)
}

pub fn summarize_deaths(records: &[DeathRecord]) -> DeathStats {
    summarize(records)
}
