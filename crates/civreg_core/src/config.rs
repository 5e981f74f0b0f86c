//! Layered runtime configuration.
//!
//! # Responsibility
//! - Merge defaults, an optional TOML file and `CIVREG_` environment
//!   variables into one validated `Config`.
//! - Resolve platform default locations for storage, logs and exports.
//!
//! # Invariants
//! - Precedence, lowest first: defaults, TOML file, environment.
//! - A missing config file is not an error.
//! - `load_from` never returns a config that fails `validate`.
//!
//! # See also
//! - `crate::logging` for how `LoggingConfig` is applied.

use crate::export::csv_export::validate_date_format;
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::repo::record_store::MalformedPolicy;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "civreg.toml";
const APP_DIR_NAME: &str = "civreg";
const STORAGE_FILE_NAME: &str = "civreg.sqlite3";
const ENV_PREFIX: &str = "CIVREG_";
/// `CIVREG_STORAGE__PATH` sets `storage.path`.
const ENV_SEPARATOR: &str = "__";

#[derive(Debug)]
pub enum ConfigError {
    Load(Box<figment::Error>),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err.as_ref()),
            Self::Invalid(_) => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Load(Box::new(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One SQLite file holding the `local_storage` table.
    #[default]
    Sqlite,
    /// Process-local map; nothing survives exit.
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Defaults to `<data_local_dir>/civreg/civreg.sqlite3`.
    pub path: Option<PathBuf>,
    pub on_malformed: MalformedPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// Absolute path; defaults to `<data_local_dir>/civreg/logs`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level().to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// strftime pattern for date cells.
    pub date_format: String,
    /// Defaults to the current working directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            date_format: crate::export::csv_export::DEFAULT_DATE_FORMAT.to_string(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from the file at `config_path` (or the default
    /// location when `None`) layered under the environment.
    ///
    /// # Errors
    /// - `Load` when a source cannot be parsed into `Config`.
    /// - `Invalid` when the merged values fail `validate`.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid(format!("logging.level: {err}")))?;

        if let Some(directory) = &self.logging.directory {
            normalize_log_dir(directory)
                .map_err(|err| ConfigError::Invalid(format!("logging.directory: {err}")))?;
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "storage.path cannot be empty".to_string(),
                ));
            }
        }

        validate_date_format(&self.export.date_format)
            .map_err(|err| ConfigError::Invalid(format!("export.date_format: {err}")))?;

        Ok(())
    }

    /// Storage file path, resolving the default when unset.
    pub fn storage_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(STORAGE_FILE_NAME))
    }

    /// Log directory, resolving the default when unset.
    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("logs"))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, StorageBackend};
    use crate::repo::record_store::MalformedPolicy;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.on_malformed, MalformedPolicy::Reject);
        assert!(config.logging.enabled);
        assert_eq!(config.export.date_format, "%Y-%m-%d");
        config.validate().unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.storage, Config::default().storage);
        assert_eq!(config.export, Config::default().export);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let file = write_config(
            r#"
            [storage]
            backend = "memory"
            on_malformed = "treat_as_empty"

            [export]
            date_format = "%d/%m/%Y"
            output_dir = "/tmp/civreg-exports"
            "#,
        );

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.on_malformed, MalformedPolicy::TreatAsEmpty);
        assert_eq!(config.export.date_format, "%d/%m/%Y");
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/civreg-exports"));
    }

    #[test]
    fn invalid_level_is_rejected_on_load() {
        let file = write_config("[logging]\nlevel = \"chatty\"\n");
        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn validate_rejects_relative_log_dir_and_bad_date_format() {
        let mut config = Config::default();
        config.logging.directory = Some(PathBuf::from("logs"));
        assert!(config.validate().unwrap_err().to_string().contains("absolute"));

        let mut config = Config::default();
        config.export.date_format = "%Q".to_string();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("export.date_format"));

        // Time-of-day specifiers have nothing to render for a calendar date.
        let mut config = Config::default();
        config.export.date_format = "%d/%m/%Y %H:%M".to_string();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("export.date_format"));
    }

    #[test]
    fn unknown_backend_fails_to_load() {
        let file = write_config("[storage]\nbackend = \"indexeddb\"\n");
        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn resolved_paths_use_app_directory() {
        let config = Config::default();
        assert!(config.storage_path().ends_with("civreg/civreg.sqlite3"));
        assert!(config.log_dir().ends_with("civreg/logs"));
    }
}
