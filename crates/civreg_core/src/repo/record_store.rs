//! `RecordStore`: the single mediator between records and stored collections.
//!
//! # Invariants
//! - `list` returns stored (insertion) order.
//! - An absent or blank collection value reads as an empty collection.
//! - `update`/`remove` never insert; a miss leaves storage untouched.
//! - Mutations never write over a collection that failed to decode, whatever
//!   the `MalformedPolicy`.
//! - `registrationDate` is never earlier than the `create` call.
//! - Writes are last-write-wins on the whole collection. Two stores sharing
//!   one backend can overwrite each other's changes; nothing detects it.

use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use crate::model::record::{AnyRecord, Record, RecordId, RecordKind, RecordValidationError};
use crate::search::query::{filter_records, SearchQuery};
use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Semantic and transport errors of record persistence.
#[derive(Debug)]
pub enum StoreError {
    NotFound { kind: RecordKind, id: RecordId },
    Validation(RecordValidationError),
    Storage(StorageError),
    /// The stored collection could not be decoded.
    MalformedStorage { key: &'static str, message: String },
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::MalformedStorage { key, message } => {
                write!(f, "stored collection `{key}` is malformed: {message}")
            }
            Self::Serialization(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound { .. } | Self::MalformedStorage { .. } => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// What reads do with a stored collection that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Surface `StoreError::MalformedStorage`.
    #[default]
    Reject,
    /// Log a warning and read as empty. Writes still fail with
    /// `MalformedStorage` so the stored value is kept for repair.
    TreatAsEmpty,
}

/// Record collections persisted through a key-value backend.
#[derive(Debug)]
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    on_malformed: MalformedPolicy,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_policy(storage, MalformedPolicy::default())
    }

    pub fn with_policy(storage: S, on_malformed: MalformedPolicy) -> Self {
        Self {
            storage,
            on_malformed,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Raw backend access for collaborators that own other keys (settings).
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Lists the full collection of `R` in stored order.
    pub fn list<R: Record>(&self) -> StoreResult<Vec<R>> {
        self.load::<R>()
    }

    /// Finds one record by id.
    pub fn get<R: Record>(&self, id: &RecordId) -> StoreResult<Option<R>> {
        Ok(self
            .load::<R>()?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Appends a new record with a fresh id and the current registration time.
    pub fn create<R: Record>(&mut self, fields: R::Fields) -> StoreResult<R> {
        let mut records = self.load_for_write::<R>()?;
        let record = R::from_parts(unused_id(&records), registration_timestamp(), fields);
        if let Err(err) = record.validate() {
            warn!(
                "event=record_create module=repo status=error kind={} error_code=validation error={err}",
                R::KIND
            );
            return Err(err.into());
        }

        records.push(record.clone());
        self.persist(&records)?;
        info!(
            "event=record_create module=repo status=ok kind={} id={} count={}",
            R::KIND,
            record.id(),
            records.len()
        );
        Ok(record)
    }

    /// Overlays `patch` onto the record with `id` and rewrites the collection.
    pub fn update<R: Record>(&mut self, id: &RecordId, patch: R::Patch) -> StoreResult<R> {
        let mut records = self.load_for_write::<R>()?;
        let Some(position) = records.iter().position(|record| record.id() == id) else {
            warn!(
                "event=record_update module=repo status=error kind={} id={id} error_code=not_found",
                R::KIND
            );
            return Err(StoreError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            });
        };

        let mut updated = records[position].clone();
        updated.apply_patch(patch);
        if let Err(err) = updated.validate() {
            warn!(
                "event=record_update module=repo status=error kind={} id={id} error_code=validation error={err}",
                R::KIND
            );
            return Err(err.into());
        }

        records[position] = updated.clone();
        self.persist(&records)?;
        info!(
            "event=record_update module=repo status=ok kind={} id={id}",
            R::KIND
        );
        Ok(updated)
    }

    /// Drops the record with `id`. Returns whether anything was removed.
    pub fn remove<R: Record>(&mut self, id: &RecordId) -> StoreResult<bool> {
        let mut records = self.load_for_write::<R>()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            info!(
                "event=record_remove module=repo status=ok kind={} id={id} removed=false",
                R::KIND
            );
            return Ok(false);
        }

        self.persist(&records)?;
        info!(
            "event=record_remove module=repo status=ok kind={} id={id} removed=true count={}",
            R::KIND,
            records.len()
        );
        Ok(true)
    }

    /// Records of `R` with at least one searchable field containing the query.
    pub fn search<R: Record>(&self, query: &SearchQuery) -> StoreResult<Vec<R>> {
        Ok(filter_records(self.load::<R>()?, query))
    }

    /// Both collections, births first, each in stored order.
    pub fn list_all(&self) -> StoreResult<Vec<AnyRecord>> {
        let mut all = self
            .list::<BirthRecord>()?
            .into_iter()
            .map(Record::into_any)
            .collect::<Vec<_>>();
        all.extend(self.list::<DeathRecord>()?.into_iter().map(Record::into_any));
        Ok(all)
    }

    /// Cross-kind lookup by first name, last name or id fragment.
    ///
    /// At most `limit` hits, births first. A blank query finds nothing.
    pub fn search_profiles(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> StoreResult<Vec<AnyRecord>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|record| query.matches_profile(record))
            .take(limit)
            .collect())
    }

    fn load<R: Record>(&self) -> StoreResult<Vec<R>> {
        match self.load_for_write::<R>() {
            Err(StoreError::MalformedStorage { key, .. })
                if self.on_malformed == MalformedPolicy::TreatAsEmpty =>
            {
                warn!(
                    "event=collection_load module=repo status=degraded key={key} error_code=malformed fallback=empty"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Decodes the stored collection; a malformed value is always an error.
    fn load_for_write<R: Record>(&self) -> StoreResult<Vec<R>> {
        let key = R::KIND.storage_key();
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str::<Vec<R>>(&raw).map_err(|err| {
            // Log position only: serde messages can echo stored personal data.
            error!(
                "event=collection_load module=repo status=error key={key} error_code=malformed line={} column={}",
                err.line(),
                err.column()
            );
            StoreError::MalformedStorage {
                key,
                message: err.to_string(),
            }
        })
    }

    fn persist<R: Record>(&mut self, records: &[R]) -> StoreResult<()> {
        let encoded = serde_json::to_string(records)?;
        self.storage.set_item(R::KIND.storage_key(), &encoded)?;
        Ok(())
    }
}

/// Current time rounded up to the next whole millisecond, the precision the
/// stored layout keeps.
fn registration_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    let truncated = now.trunc_subsecs(3);
    if truncated == now {
        now
    } else {
        truncated + Duration::milliseconds(1)
    }
}

fn unused_id<R: Record>(records: &[R]) -> RecordId {
    let taken = records.iter().map(Record::id).collect::<HashSet<_>>();
    loop {
        let candidate = RecordId::generate();
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}
