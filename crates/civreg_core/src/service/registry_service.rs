//! Registration use-case service.
//!
//! # Responsibility
//! - Expose register/edit/remove/search/export/certificate use cases over a
//!   `RecordStore`.
//! - Assemble the dashboard snapshot from both collections and settings.
//!
//! # Invariants
//! - Every use case emits exactly one `module=service` event.
//! - Settings are read through the same backend as the records but never
//!   influence what the store persists.

use crate::certificate::text::{Certificate, Certify};
use crate::export::csv_export::{export_to_dir, ExportError, ExportOptions, ExportRow};
use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use crate::model::record::{AnyRecord, Record, RecordId};
use crate::repo::record_store::{RecordStore, StoreError};
use crate::search::query::SearchQuery;
use crate::service::activity::{notifications, recent_activity, ActivityEntry, Notification};
use crate::settings::app_settings::{
    load_settings, reset_settings, save_settings, AppSettings, SettingsError,
};
use crate::stats::summary::{summarize_births, summarize_deaths, BirthStats, DeathStats};
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Export(ExportError),
    Settings(SettingsError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "export failed: {err}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<SettingsError> for ServiceError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

/// Dashboard view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub birth: BirthStats,
    pub death: DeathStats,
    /// Raw collection sizes, including births with an unrecognized gender.
    pub birth_count: usize,
    pub death_count: usize,
    /// Empty when recent activities are switched off in settings.
    pub recent: Vec<ActivityEntry>,
}

/// Registration service facade over a record store.
#[derive(Debug)]
pub struct RegistryService<S: KeyValueStore> {
    store: RecordStore<S>,
    export_options: ExportOptions,
}

impl<S: KeyValueStore> RegistryService<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self::with_export_options(store, ExportOptions::default())
    }

    pub fn with_export_options(store: RecordStore<S>, export_options: ExportOptions) -> Self {
        Self {
            store,
            export_options,
        }
    }

    /// Registers a new birth or death from form input.
    pub fn register<R: Record>(&mut self, fields: R::Fields) -> ServiceResult<R> {
        let record = self.store.create::<R>(fields)?;
        info!(
            "event=register module=service status=ok kind={} id={}",
            R::KIND,
            record.id()
        );
        Ok(record)
    }

    /// Applies an edit-form patch.
    pub fn edit<R: Record>(&mut self, id: &RecordId, patch: R::Patch) -> ServiceResult<R> {
        let record = self.store.update::<R>(id, patch)?;
        info!(
            "event=edit module=service status=ok kind={} id={id}",
            R::KIND
        );
        Ok(record)
    }

    /// Removes (discharges) a record; `false` when no record had `id`.
    pub fn remove<R: Record>(&mut self, id: &RecordId) -> ServiceResult<bool> {
        let removed = self.store.remove::<R>(id)?;
        info!(
            "event=remove module=service status=ok kind={} id={id} removed={removed}",
            R::KIND
        );
        Ok(removed)
    }

    /// One record, or `StoreError::NotFound`.
    pub fn find<R: Record>(&self, id: &RecordId) -> ServiceResult<R> {
        self.store.get::<R>(id)?.ok_or_else(|| {
            warn!(
                "event=find module=service status=error kind={} id={id} error_code=not_found",
                R::KIND
            );
            ServiceError::Store(StoreError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            })
        })
    }

    /// The listing shown by the records screen: all records, or the matches
    /// of `query` when one is given.
    pub fn listing<R: Record>(&self, query: Option<&SearchQuery>) -> ServiceResult<Vec<R>> {
        let records = match query {
            Some(query) => self.store.search::<R>(query)?,
            None => self.store.list::<R>()?,
        };
        info!(
            "event=listing module=service status=ok kind={} filtered={} count={}",
            R::KIND,
            query.is_some(),
            records.len()
        );
        Ok(records)
    }

    /// Header search across both kinds, capped at `limit` hits.
    pub fn search_profiles(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> ServiceResult<Vec<AnyRecord>> {
        let hits = self.store.search_profiles(query, limit)?;
        info!(
            "event=profile_search module=service status=ok count={}",
            hits.len()
        );
        Ok(hits)
    }

    /// Counters plus the recent-activity feed sized by dashboard settings.
    pub fn dashboard(&self, on: Option<NaiveDate>) -> ServiceResult<DashboardSnapshot> {
        let settings = self.settings()?;
        let births = self.store.list::<BirthRecord>()?;
        let deaths = self.store.list::<DeathRecord>()?;

        let recent = if settings.dashboard.show_recent_activities {
            recent_activity(
                self.store.list_all()?,
                on,
                settings.dashboard.max_recent_items as usize,
            )
        } else {
            Vec::new()
        };

        let snapshot = DashboardSnapshot {
            birth: summarize_births(&births),
            death: summarize_deaths(&deaths),
            birth_count: births.len(),
            death_count: deaths.len(),
            recent,
        };
        info!(
            "event=dashboard module=service status=ok births={} deaths={}",
            snapshot.birth_count, snapshot.death_count
        );
        Ok(snapshot)
    }

    /// Newest registrations of either kind, independent of dashboard settings.
    pub fn activity(&self, on: Option<NaiveDate>, limit: usize) -> ServiceResult<Vec<ActivityEntry>> {
        let feed = recent_activity(self.store.list_all()?, on, limit);
        info!(
            "event=activity module=service status=ok count={}",
            feed.len()
        );
        Ok(feed)
    }

    pub fn notifications(&self, limit: usize) -> ServiceResult<Vec<Notification>> {
        let feed = notifications(self.store.list_all()?, limit);
        info!(
            "event=notifications module=service status=ok count={}",
            feed.len()
        );
        Ok(feed)
    }

    /// Exports the listing (optionally filtered) into `dir`.
    pub fn export<R: ExportRow>(
        &self,
        query: Option<&SearchQuery>,
        dir: &Path,
    ) -> ServiceResult<PathBuf> {
        let records = self.listing::<R>(query)?;
        let path = export_to_dir(&records, dir, &self.export_options)?;
        info!(
            "event=export module=service status=ok kind={} rows={}",
            R::KIND,
            records.len()
        );
        Ok(path)
    }

    pub fn certificate<R: Certify>(&self, id: &RecordId) -> ServiceResult<Certificate> {
        let certificate = self.find::<R>(id)?.certificate();
        info!(
            "event=certificate module=service status=ok kind={} id={id}",
            R::KIND
        );
        Ok(certificate)
    }

    pub fn settings(&self) -> ServiceResult<AppSettings> {
        Ok(load_settings(self.store.storage())?)
    }

    pub fn save_settings(&mut self, settings: &AppSettings) -> ServiceResult<()> {
        save_settings(self.store.storage_mut(), settings)?;
        Ok(())
    }

    pub fn reset_settings(&mut self) -> ServiceResult<AppSettings> {
        Ok(reset_settings(self.store.storage_mut())?)
    }
}
