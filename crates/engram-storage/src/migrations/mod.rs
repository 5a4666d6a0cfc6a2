//! Versioned schema migrations tracked via `PRAGMA user_version`.

mod v001_context_tables;
mod v002_metric_tables;
mod v003_decision_tables;

use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

/// Ordered list of migrations; index + 1 is the schema version.
const MIGRATIONS: &[fn(&Connection) -> EngramResult<()>] = &[
    v001_context_tables::migrate,
    v002_metric_tables::migrate,
    v003_decision_tables::migrate,
];

/// Current schema version the code expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Run all pending migrations. Each migration commits atomically and bumps
/// `user_version` inside the same transaction.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (idx, migrate) in MIGRATIONS.iter().enumerate() {
        let version = idx as u32 + 1;
        if version <= current {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {version} begin: {e}")))?;
        migrate(&tx).map_err(|e| {
            EngramError::Storage(StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })
        })?;
        tx.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(format!("migration {version} version bump: {e}")))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration {version} commit: {e}")))?;
        tracing::debug!(version, "applied schema migration");
    }
    Ok(())
}
