//! Birth registration record.

use crate::model::record::{
    join_name, require_date, require_text, AnyRecord, Record, RecordId, RecordKind,
    RecordValidationError,
};
use crate::model::wire;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Form fields collected by the birth registration form.
///
/// Optional values are stored as empty strings, matching what the form
/// submits for untouched inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthFields {
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub time_hour: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub time_min: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub time_sec: String,
    /// Free-form in stored data; the form offers `male|female|other`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub place_of_birth: String,
    /// `corporation|panchayath|municipality|other`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub locality: String,
    /// `natural|cesarean`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub mode_of_birth: String,
    /// `single|twins|triplets|other`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub parity: String,
    /// Kilograms, as typed.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub birth_weight: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub father_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub mother_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub parent_address: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub permanent_address: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub guardian_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub guardian_address: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub father_occupation: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub mother_occupation: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub father_contact: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub mother_contact: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub guardian_contact: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::calendar_date"
    )]
    pub date_of_birth: Option<NaiveDate>,
}

impl BirthFields {
    /// Creates the minimal valid input; every other field starts empty.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            middle_name: String::new(),
            last_name: last_name.into(),
            time_hour: String::new(),
            time_min: String::new(),
            time_sec: String::new(),
            gender: String::new(),
            place_of_birth: String::new(),
            locality: String::new(),
            mode_of_birth: String::new(),
            parity: String::new(),
            birth_weight: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            parent_address: String::new(),
            permanent_address: String::new(),
            guardian_name: String::new(),
            guardian_address: String::new(),
            father_occupation: String::new(),
            mother_occupation: String::new(),
            father_contact: String::new(),
            mother_contact: String::new(),
            guardian_contact: String::new(),
            date_of_birth: Some(date_of_birth),
        }
    }
}

/// Partial update for a birth record, as submitted by the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BirthPatch {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub time_hour: Option<String>,
    pub time_min: Option<String>,
    pub time_sec: Option<String>,
    pub gender: Option<String>,
    pub place_of_birth: Option<String>,
    pub locality: Option<String>,
    pub mode_of_birth: Option<String>,
    pub parity: Option<String>,
    pub birth_weight: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub parent_address: Option<String>,
    pub permanent_address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_address: Option<String>,
    pub father_occupation: Option<String>,
    pub mother_occupation: Option<String>,
    pub father_contact: Option<String>,
    pub mother_contact: Option<String>,
    pub guardian_contact: Option<String>,
    #[serde(default, deserialize_with = "wire::calendar_date::deserialize")]
    pub date_of_birth: Option<NaiveDate>,
}

/// One entry of the `birthRecords` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: BirthFields,
    #[serde(with = "wire::timestamp")]
    pub registration_date: DateTime<Utc>,
}

impl BirthRecord {
    /// Birth time as `hh:mm:ss`, or `None` when no part was recorded.
    pub fn time_of_birth(&self) -> Option<String> {
        let BirthFields {
            time_hour,
            time_min,
            time_sec,
            ..
        } = &self.fields;
        if [time_hour, time_min, time_sec]
            .iter()
            .all(|part| part.trim().is_empty())
        {
            return None;
        }
        Some(format!("{time_hour}:{time_min}:{time_sec}"))
    }
}

impl Record for BirthRecord {
    type Fields = BirthFields;
    type Patch = BirthPatch;

    const KIND: RecordKind = RecordKind::Birth;

    fn from_parts(id: RecordId, registration_date: DateTime<Utc>, fields: BirthFields) -> Self {
        Self {
            id,
            fields,
            registration_date,
        }
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }

    fn first_name(&self) -> &str {
        &self.fields.first_name
    }

    fn last_name(&self) -> &str {
        &self.fields.last_name
    }

    fn gender(&self) -> &str {
        &self.fields.gender
    }

    fn full_name(&self) -> String {
        join_name(&[
            &self.fields.first_name,
            &self.fields.middle_name,
            &self.fields.last_name,
        ])
    }

    fn searchable_fields(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.fields.father_name.clone(),
            self.fields.mother_name.clone(),
        ]
    }

    fn apply_patch(&mut self, patch: BirthPatch) {
        overlay!(self.fields, patch;
            first_name,
            middle_name,
            last_name,
            time_hour,
            time_min,
            time_sec,
            gender,
            place_of_birth,
            locality,
            mode_of_birth,
            parity,
            birth_weight,
            father_name,
            mother_name,
            parent_address,
            permanent_address,
            guardian_name,
            guardian_address,
            father_occupation,
            mother_occupation,
            father_contact,
            mother_contact,
            guardian_contact,
        );
        if patch.date_of_birth.is_some() {
            self.fields.date_of_birth = patch.date_of_birth;
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("firstName", &self.fields.first_name)?;
        require_text("lastName", &self.fields.last_name)?;
        require_date("dateOfBirth", self.fields.date_of_birth)?;
        Ok(())
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Birth(self)
    }
}
