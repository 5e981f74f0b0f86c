//! SQLite-file storage backend.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for the `local_storage` table.
//! - Apply storage migrations before handing out a usable backend.
//!
//! # Invariants
//! - Returned backends have migrations fully applied.
//! - Each `set_item` is a single-row upsert; there is no multi-key transaction.

use super::migrations::apply_migrations;
use super::{KeyValueStore, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value storage persisted in one SQLite table.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps a connection that has already been bootstrapped.
    pub fn from_connection(mut conn: Connection) -> StorageResult<Self> {
        bootstrap_connection(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Opens (or creates) a storage file and applies pending migrations.
///
/// # Side effects
/// - Emits `storage_open` logging events with duration and status.
pub fn open_storage(path: impl AsRef<Path>) -> StorageResult<SqliteStorage> {
    open_with("file", || Connection::open(path.as_ref()))
}

/// Opens a private in-memory storage database.
pub fn open_storage_in_memory() -> StorageResult<SqliteStorage> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<SqliteStorage> {
    let started_at = Instant::now();
    info!("event=storage_open module=storage status=start mode={mode}");

    let conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=storage_open module=storage status=error mode={mode} duration_ms={} error_code=storage_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    match SqliteStorage::from_connection(conn) {
        Ok(storage) => {
            info!(
                "event=storage_open module=storage status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(storage)
        }
        Err(err) => {
            error!(
                "event=storage_open module=storage status=error mode={mode} duration_ms={} error_code=storage_bootstrap_failed error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}

impl KeyValueStore for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
