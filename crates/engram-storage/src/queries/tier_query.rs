//! The tier loader's three indexed predicates: recency windows over
//! `last_accessed` and the promotion scan over `access_count`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::ContextRecord;

use super::context_crud::collect_contexts;
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "id, project_key, payload, algorithm, strategy,
    original_tokens, compressed_tokens, metadata,
    created_at, last_accessed, access_count";

/// Records accessed at or after `cutoff`, most recent first.
pub fn list_accessed_since(
    conn: &Connection,
    cutoff: DateTime<Utc>,
    limit: usize,
) -> EngramResult<Vec<ContextRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM contexts
             WHERE julianday(last_accessed) >= julianday(?1)
             ORDER BY last_accessed DESC
             LIMIT ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_contexts(&mut stmt, params![cutoff.to_rfc3339(), limit as i64])
}

/// Records accessed in `[older, newer)`, most recent first.
pub fn list_accessed_between(
    conn: &Connection,
    older: DateTime<Utc>,
    newer: DateTime<Utc>,
    limit: usize,
) -> EngramResult<Vec<ContextRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM contexts
             WHERE julianday(last_accessed) >= julianday(?1)
               AND julianday(last_accessed) < julianday(?2)
             ORDER BY last_accessed DESC
             LIMIT ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_contexts(
        &mut stmt,
        params![older.to_rfc3339(), newer.to_rfc3339(), limit as i64],
    )
}

/// One page of records accessed before `cutoff`, oldest first. The caller
/// drives pagination; nothing is retained between calls.
pub fn list_cold_page(
    conn: &Connection,
    cutoff: DateTime<Utc>,
    offset: usize,
    limit: usize,
) -> EngramResult<Vec<ContextRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM contexts
             WHERE julianday(last_accessed) < julianday(?1)
             ORDER BY last_accessed ASC
             LIMIT ?2 OFFSET ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_contexts(
        &mut stmt,
        params![cutoff.to_rfc3339(), limit as i64, offset as i64],
    )
}

/// Records outside the hot window whose access count strictly exceeds the
/// threshold, busiest first. Deliberately includes cold records — a cold
/// record with heavy lifetime use warms back up through this path.
pub fn promotion_candidates(
    conn: &Connection,
    threshold: u64,
    hot_cutoff: DateTime<Utc>,
    limit: usize,
) -> EngramResult<Vec<ContextRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM contexts
             WHERE access_count > ?1
               AND julianday(last_accessed) < julianday(?2)
             ORDER BY access_count DESC
             LIMIT ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_contexts(
        &mut stmt,
        params![threshold as i64, hot_cutoff.to_rfc3339(), limit as i64],
    )
}
