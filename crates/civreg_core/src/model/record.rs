//! Record identity, kinds and the contract shared by both collections.
//!
//! # Invariants
//! - `RecordId` is unique within its collection. New ids are UUID v4
//!   strings; ids written by older front ends (millisecond timestamps) are
//!   kept verbatim.
//! - Each `RecordKind` owns exactly one storage key.

use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Storage key of the birth collection.
pub const BIRTH_RECORDS_KEY: &str = "birthRecords";
/// Storage key of the death collection.
pub const DEATH_RECORDS_KEY: &str = "deathRecords";

/// The two registration domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Birth,
    Death,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Birth, RecordKind::Death];

    /// Fixed storage key holding this kind's collection.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Birth => BIRTH_RECORDS_KEY,
            Self::Death => DEATH_RECORDS_KEY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Death => "death",
        }
    }

    /// Prefix of printed certificate numbers (`BC-<id>`).
    pub fn certificate_prefix(self) -> &'static str {
        match self {
            Self::Birth => "BC",
            Self::Death => "DC",
        }
    }

    /// Prefix of printed registration numbers (`BR-<id>`).
    pub fn registration_prefix(self) -> &'static str {
        match self {
            Self::Birth => "BR",
            Self::Death => "DR",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "birth" => Ok(Self::Birth),
            "death" => Ok(Self::Death),
            other => Err(format!("unknown record kind `{other}`; expected birth|death")),
        }
    }
}

/// Opaque record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Draws a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Write-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A required field is blank or absent.
    MissingField(&'static str),
    DeathBeforeBirth {
        date_of_birth: NaiveDate,
        date_of_death: NaiveDate,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::DeathBeforeBirth {
                date_of_birth,
                date_of_death,
            } => write!(
                f,
                "dateOfDeath ({date_of_death}) must not precede dateOfBirth ({date_of_birth})"
            ),
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    Ok(())
}

pub(crate) fn require_date(
    field: &'static str,
    value: Option<NaiveDate>,
) -> Result<NaiveDate, RecordValidationError> {
    value.ok_or(RecordValidationError::MissingField(field))
}

/// Joins the non-empty name parts with single spaces.
pub fn join_name(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Contract every persisted record kind implements for the generic store.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// User-supplied form input.
    type Fields;
    /// Partial update; `None` leaves a field untouched.
    type Patch;

    const KIND: RecordKind;

    fn from_parts(id: RecordId, registration_date: DateTime<Utc>, fields: Self::Fields) -> Self;
    fn id(&self) -> &RecordId;
    fn registration_date(&self) -> DateTime<Utc>;
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;
    fn gender(&self) -> &str;
    fn full_name(&self) -> String;
    /// Values checked by substring search, in a fixed order.
    fn searchable_fields(&self) -> Vec<String>;
    fn apply_patch(&mut self, patch: Self::Patch);
    fn validate(&self) -> Result<(), RecordValidationError>;
    fn into_any(self) -> AnyRecord;
}

/// Either kind of record, for views spanning both collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyRecord {
    Birth(BirthRecord),
    Death(DeathRecord),
}

impl AnyRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Birth(_) => RecordKind::Birth,
            Self::Death(_) => RecordKind::Death,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Self::Birth(record) => record.id(),
            Self::Death(record) => record.id(),
        }
    }

    pub fn registration_date(&self) -> DateTime<Utc> {
        match self {
            Self::Birth(record) => record.registration_date(),
            Self::Death(record) => record.registration_date(),
        }
    }

    pub fn first_name(&self) -> &str {
        match self {
            Self::Birth(record) => record.first_name(),
            Self::Death(record) => record.first_name(),
        }
    }

    pub fn last_name(&self) -> &str {
        match self {
            Self::Birth(record) => record.last_name(),
            Self::Death(record) => record.last_name(),
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Self::Birth(record) => record.full_name(),
            Self::Death(record) => record.full_name(),
        }
    }
}
