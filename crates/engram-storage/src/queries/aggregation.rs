//! Store-wide and per-project aggregates over context records.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::StoreStats;

use crate::to_storage_err;

/// Aggregate context stats, optionally scoped to one project. Zero-safe:
/// an empty store yields a zeroed struct.
pub fn stats(conn: &Connection, project_key: Option<&str>) -> EngramResult<StoreStats> {
    let parse = |row: &rusqlite::Row<'_>| -> Result<StoreStats, rusqlite::Error> {
        let context_count: i64 = row.get(0)?;
        let project_count: i64 = row.get(1)?;
        let total_original: i64 = row.get(2)?;
        let total_compressed: i64 = row.get(3)?;
        let average_ratio: f64 = row.get(4)?;
        Ok(StoreStats {
            context_count: context_count as u64,
            project_count: project_count as u64,
            total_original_tokens: total_original as u64,
            total_compressed_tokens: total_compressed as u64,
            average_ratio,
        })
    };

    let result = match project_key {
        Some(key) => conn.query_row(
            "SELECT COUNT(*),
                    COUNT(DISTINCT project_key),
                    COALESCE(SUM(original_tokens), 0),
                    COALESCE(SUM(compressed_tokens), 0),
                    COALESCE(AVG(CASE WHEN original_tokens > 0
                        THEN 1.0 - CAST(compressed_tokens AS REAL) / original_tokens
                        ELSE 0 END), 0)
             FROM contexts WHERE project_key = ?1",
            params![key],
            parse,
        ),
        None => conn.query_row(
            "SELECT COUNT(*),
                    COUNT(DISTINCT project_key),
                    COALESCE(SUM(original_tokens), 0),
                    COALESCE(SUM(compressed_tokens), 0),
                    COALESCE(AVG(CASE WHEN original_tokens > 0
                        THEN 1.0 - CAST(compressed_tokens AS REAL) / original_tokens
                        ELSE 0 END), 0)
             FROM contexts",
            [],
            parse,
        ),
    };

    result.map_err(|e| to_storage_err(e.to_string()))
}
