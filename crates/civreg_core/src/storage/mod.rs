//! Key-value storage backends standing in for browser local storage.
//!
//! # Responsibility
//! - Define the minimal `get/set/remove` contract every collection and
//!   settings blob is persisted through.
//! - Provide an in-memory backend and a SQLite-file backend.
//!
//! # Invariants
//! - A value is always a complete UTF-8 document; backends never merge or
//!   partially update values.
//! - The last `set_item` for a key wins. No cross-process coordination.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::{open_storage, open_storage_in_memory, SqliteStorage};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Whole-value key/value persistence, modelled on the browser storage API.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
    /// Lists stored keys in ascending order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}
