//! Death registration record.

use crate::model::record::{
    join_name, require_date, require_text, AnyRecord, Record, RecordId, RecordKind,
    RecordValidationError,
};
use crate::model::wire;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// `causeOfDeath` value that defers to the free-text `otherCause`.
pub const OTHER_CAUSE: &str = "other";

/// Form fields collected by the death registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathFields {
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub gender: String,
    /// `aadhaar|pan|driving_license|passport|voter_id|other`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub id_proof_type: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub id_proof_number: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub permanent_address: String,
    /// `natural|accident|suicide|pending_investigation|other`.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub cause_of_death: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub other_cause: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub place_of_death: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub informant_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub informant_relation: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub informant_address: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub informant_phone: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::calendar_date"
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::calendar_date"
    )]
    pub date_of_death: Option<NaiveDate>,
}

impl DeathFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        date_of_death: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            middle_name: String::new(),
            last_name: last_name.into(),
            gender: String::new(),
            id_proof_type: String::new(),
            id_proof_number: String::new(),
            permanent_address: String::new(),
            cause_of_death: String::new(),
            other_cause: String::new(),
            place_of_death: String::new(),
            informant_name: String::new(),
            informant_relation: String::new(),
            informant_address: String::new(),
            informant_phone: String::new(),
            date_of_birth: Some(date_of_birth),
            date_of_death: Some(date_of_death),
        }
    }
}

/// Partial update for a death record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeathPatch {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub permanent_address: Option<String>,
    pub cause_of_death: Option<String>,
    pub other_cause: Option<String>,
    pub place_of_death: Option<String>,
    pub informant_name: Option<String>,
    pub informant_relation: Option<String>,
    pub informant_address: Option<String>,
    pub informant_phone: Option<String>,
    #[serde(default, deserialize_with = "wire::calendar_date::deserialize")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::calendar_date::deserialize")]
    pub date_of_death: Option<NaiveDate>,
}

/// One entry of the `deathRecords` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: DeathFields,
    #[serde(with = "wire::timestamp")]
    pub registration_date: DateTime<Utc>,
}

impl DeathRecord {
    /// Cause as shown to users: the free-text cause when `other` was picked.
    pub fn effective_cause_of_death(&self) -> &str {
        let fields = &self.fields;
        if fields.cause_of_death.trim().eq_ignore_ascii_case(OTHER_CAUSE)
            && !fields.other_cause.trim().is_empty()
        {
            return fields.other_cause.trim();
        }
        &fields.cause_of_death
    }
}

impl Record for DeathRecord {
    type Fields = DeathFields;
    type Patch = DeathPatch;

    const KIND: RecordKind = RecordKind::Death;

    fn from_parts(id: RecordId, registration_date: DateTime<Utc>, fields: DeathFields) -> Self {
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
        vec![self.full_name(), self.fields.id_proof_number.clone()]
    }

    fn apply_patch(&mut self, patch: DeathPatch) {
        overlay!(self.fields, patch;
            first_name,
            middle_name,
            last_name,
            gender,
            id_proof_type,
            id_proof_number,
            permanent_address,
            cause_of_death,
            other_cause,
            place_of_death,
            informant_name,
            informant_relation,
            informant_address,
            informant_phone,
        );
        if patch.date_of_birth.is_some() {
            self.fields.date_of_birth = patch.date_of_birth;
        }
        if patch.date_of_death.is_some() {
            self.fields.date_of_death = patch.date_of_death;
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("firstName", &self.fields.first_name)?;
        require_text("lastName", &self.fields.last_name)?;
        let date_of_birth = require_date("dateOfBirth", self.fields.date_of_birth)?;
        let date_of_death = require_date("dateOfDeath", self.fields.date_of_death)?;
        if date_of_death < date_of_birth {
            return Err(RecordValidationError::DeathBeforeBirth {
                date_of_birth,
                date_of_death,
            });
        }
        Ok(())
    }

    fn into_any(self) -> AnyRecord {
        AnyRecord::Death(self)
    }
}
