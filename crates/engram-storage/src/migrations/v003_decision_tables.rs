//! v003: decision audit trail (append-only, outcome backfill allowed).

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS decisions (
            id         TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            task_id    TEXT,
            decision   TEXT NOT NULL,
            reasoning  TEXT NOT NULL DEFAULT '',
            context    TEXT NOT NULL DEFAULT '',
            outcome    TEXT,
            timestamp  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_decisions_session ON decisions(session_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
