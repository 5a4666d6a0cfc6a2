//! v002: append-only compression metrics.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS compression_metrics (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            context_id        TEXT NOT NULL,
            session_id        TEXT NOT NULL,
            original_tokens   INTEGER NOT NULL,
            compressed_tokens INTEGER NOT NULL,
            ratio             REAL NOT NULL,
            elapsed_ms        REAL NOT NULL,
            algorithm         TEXT NOT NULL,
            strategy          TEXT NOT NULL,
            timestamp         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_metrics_timestamp ON compression_metrics(timestamp);
        CREATE INDEX IF NOT EXISTS idx_metrics_session ON compression_metrics(session_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
