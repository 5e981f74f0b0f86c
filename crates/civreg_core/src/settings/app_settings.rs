//! `appSettings` document and its load/save helpers.

use crate::model::record::RecordKind;
use crate::storage::{KeyValueStore, StorageError};
use log::{info, warn};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the settings blob.
pub const APP_SETTINGS_KEY: &str = "appSettings";

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug)]
pub enum SettingsError {
    Storage(StorageError),
    Malformed(String),
    Serialization(serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Malformed(message) => write!(f, "stored settings are malformed: {message}"),
            Self::Serialization(err) => write!(f, "failed to encode settings: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Malformed(_) => None,
        }
    }
}

impl From<StorageError> for SettingsError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// All persisted UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub dashboard: DashboardSettings,
    pub birth_registration: RegistrationSettings,
    pub death_registration: RegistrationSettings,
    pub certificates: CertificateSettings,
    pub system: SystemSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dashboard: DashboardSettings::default(),
            birth_registration: RegistrationSettings::for_kind(RecordKind::Birth),
            death_registration: RegistrationSettings::for_kind(RecordKind::Death),
            certificates: CertificateSettings::default(),
            system: SystemSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn registration(&self, kind: RecordKind) -> &RegistrationSettings {
        match kind {
            RecordKind::Birth => &self.birth_registration,
            RecordKind::Death => &self.death_registration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub show_quick_actions: bool,
    pub show_recent_activities: bool,
    /// `cards|list`.
    pub default_view: String,
    /// Seconds.
    #[serde(deserialize_with = "lenient_u32")]
    pub refresh_interval: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_recent_items: u32,
    pub theme: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            show_quick_actions: true,
            show_recent_activities: true,
            default_view: "cards".to_string(),
            refresh_interval: 30,
            max_recent_items: 5,
            theme: "light".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationSettings {
    pub require_all_fields: bool,
    pub auto_generate_id: bool,
    pub notify_on_registration: bool,
    pub default_hospital: String,
    /// Minutes.
    #[serde(deserialize_with = "lenient_u32")]
    pub auto_save_interval: u32,
    pub required_documents: String,
}

impl RegistrationSettings {
    pub fn for_kind(kind: RecordKind) -> Self {
        let required_documents = match kind {
            RecordKind::Birth => "Birth Certificate, ID Card",
            RecordKind::Death => "Death Certificate, ID Card",
        };
        Self {
            require_all_fields: true,
            auto_generate_id: true,
            notify_on_registration: true,
            default_hospital: "HODO Hospital".to_string(),
            auto_save_interval: 2,
            required_documents: required_documents.to_string(),
        }
    }
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self::for_kind(RecordKind::Birth)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateSettings {
    pub include_hospital_logo: bool,
    pub default_template: String,
    pub watermark: bool,
    pub quality_level: String,
    pub auto_generate: bool,
    pub signature_required: bool,
}

impl Default for CertificateSettings {
    fn default() -> Self {
        Self {
            include_hospital_logo: true,
            default_template: "standard".to_string(),
            watermark: false,
            quality_level: "high".to_string(),
            auto_generate: false,
            signature_required: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub dark_mode: bool,
    pub language: String,
    pub auto_save: bool,
    pub maintenance_mode: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            language: "English".to_string(),
            auto_save: true,
            maintenance_mode: false,
        }
    }
}

/// Reads settings, falling back to defaults when none were saved.
pub fn load_settings<S: KeyValueStore + ?Sized>(storage: &S) -> SettingsResult<AppSettings> {
    let Some(raw) = storage.get_item(APP_SETTINGS_KEY)? else {
        return Ok(AppSettings::default());
    };
    if raw.trim().is_empty() {
        return Ok(AppSettings::default());
    }

    serde_json::from_str(&raw).map_err(|err| {
        warn!(
            "event=settings_load module=settings status=error error_code=malformed line={} column={}",
            err.line(),
            err.column()
        );
        SettingsError::Malformed(err.to_string())
    })
}

/// Persists the whole settings document.
pub fn save_settings<S: KeyValueStore + ?Sized>(
    storage: &mut S,
    settings: &AppSettings,
) -> SettingsResult<()> {
    let encoded = serde_json::to_string(settings)?;
    storage.set_item(APP_SETTINGS_KEY, &encoded)?;
    info!("event=settings_save module=settings status=ok");
    Ok(())
}

/// Forgets saved settings and returns the defaults now in effect.
pub fn reset_settings<S: KeyValueStore + ?Sized>(storage: &mut S) -> SettingsResult<AppSettings> {
    storage.remove_item(APP_SETTINGS_KEY)?;
    info!("event=settings_reset module=settings status=ok");
    Ok(AppSettings::default())
}

/// Older blobs store numeric preferences as strings (`"30"`).
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    deserializer.deserialize_any(LenientU32Visitor)
}

struct LenientU32Visitor;

impl Visitor<'_> for LenientU32Visitor {
    type Value = u32;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u32, E> {
        u32::try_from(value).map_err(|_| E::custom(format!("{value} is out of range")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u32, E> {
        u32::try_from(value).map_err(|_| E::custom(format!("{value} is out of range")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u32, E> {
        value
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("`{value}` is not a number")))
    }
}
