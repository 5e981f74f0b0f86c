//! Schema upgrades for the `local_storage` key-value table.
//!
//! The table is the whole schema: one row per storage key. Upgrades only
//! change how that table is shaped; the JSON documents in `value` are left
//! exactly as written.
//!
//! # Invariants
//! - `SCHEMA_STEPS[n]` upgrades schema version `n` to `n + 1`.
//! - `PRAGMA user_version` holds the version the file is at.
//! - A file written by a newer binary is refused, never downgraded.

use crate::storage::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

/// Upgrade scripts, oldest first. Append only.
const SCHEMA_STEPS: &[&str] = &[include_str!("0001_local_storage.sql")];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings the storage table up to `latest_version` in one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this binary.
/// - `Sqlite` when a step fails; the file keeps its previous version.
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let latest = latest_version();
    if found > latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending = &SCHEMA_STEPS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for script in pending {
        tx.execute_batch(script)?;
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    info!("event=storage_migrate module=storage status=ok from_version={found} to_version={latest}");
    Ok(())
}
