//! Core domain logic for the civil registration record store.
//! Birth and death collections, their search, statistics, export and
//! certificates, persisted through a key-value backend.

pub mod certificate;
pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod settings;
pub mod stats;
pub mod storage;

pub use certificate::text::{Certificate, CertificateSection, Certify};
pub use config::{Config, ConfigError, StorageBackend};
pub use export::csv_export::{
    export_file_name, export_to_dir, write_csv, ExportError, ExportOptions, ExportRow,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::birth::{BirthFields, BirthPatch, BirthRecord};
pub use model::death::{DeathFields, DeathPatch, DeathRecord};
pub use model::record::{AnyRecord, Record, RecordId, RecordKind, RecordValidationError};
pub use repo::record_store::{MalformedPolicy, RecordStore, StoreError, StoreResult};
pub use search::query::{SearchQuery, DEFAULT_PROFILE_LIMIT};
pub use service::activity::{ActivityEntry, Notification};
pub use service::registry_service::{
    DashboardSnapshot, RegistryService, ServiceError, ServiceResult,
};
pub use settings::app_settings::{AppSettings, SettingsError};
pub use stats::summary::{summarize, BirthStats, DeathStats, Summarize};
pub use storage::{
    open_storage, open_storage_in_memory, KeyValueStore, MemoryStorage, SqliteStorage,
    StorageError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
