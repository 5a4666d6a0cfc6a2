//! v001: contexts + projects, with the three tier-query indexes.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS contexts (
            id                TEXT PRIMARY KEY,
            project_key       TEXT NOT NULL,
            payload           BLOB NOT NULL,
            algorithm         TEXT NOT NULL,
            strategy          TEXT NOT NULL,
            original_tokens   INTEGER NOT NULL,
            compressed_tokens INTEGER NOT NULL,
            metadata          TEXT NOT NULL DEFAULT '{}',
            created_at        TEXT NOT NULL,
            last_accessed     TEXT NOT NULL,
            access_count      INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_contexts_project ON contexts(project_key);
        CREATE INDEX IF NOT EXISTS idx_contexts_last_accessed ON contexts(last_accessed);
        CREATE INDEX IF NOT EXISTS idx_contexts_access_count ON contexts(access_count);

        CREATE TABLE IF NOT EXISTS projects (
            key           TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            path          TEXT,
            context_count INTEGER NOT NULL DEFAULT 0,
            total_tokens  INTEGER NOT NULL DEFAULT 0,
            first_seen    TEXT NOT NULL,
            last_updated  TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
