//! Insert, get, access bookkeeping, listing, and retention delete for
//! context records. Every multi-statement write runs in one transaction so
//! the project aggregate can never disagree with the actual record set.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::ContextRecord;

use super::project_ops;
use super::OptionalRow;
use crate::to_storage_err;

/// Insert-or-replace a context record and upsert its project aggregate.
pub fn save_context(conn: &Connection, record: &ContextRecord) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("save_context begin: {e}")))?;

    match save_context_in(&tx, record) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("save_context commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Inner save logic, operating on the provided connection (or transaction
/// via Deref). Used directly by import, which runs its own transaction.
pub(crate) fn save_context_in(conn: &Connection, record: &ContextRecord) -> EngramResult<()> {
    let metadata_json =
        serde_json::to_string(&record.metadata).map_err(|e| to_storage_err(e.to_string()))?;

    // A replace may move the row to a different project; the old project's
    // aggregate must be recounted as well, in the same transaction.
    let previous_key: Option<String> = conn
        .query_row(
            "SELECT project_key FROM contexts WHERE id = ?1",
            params![record.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    project_ops::ensure_project(conn, &record.project_key, record.created_at)?;

    conn.execute(
        "INSERT OR REPLACE INTO contexts (
            id, project_key, payload, algorithm, strategy,
            original_tokens, compressed_tokens, metadata,
            created_at, last_accessed, access_count
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id,
            record.project_key,
            record.payload,
            record.algorithm.as_str(),
            record.strategy.as_str(),
            record.original_tokens as i64,
            record.compressed_tokens as i64,
            metadata_json,
            record.created_at.to_rfc3339(),
            record.last_accessed.to_rfc3339(),
            record.access_count as i64,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    // Recount rather than delta-update: a replace may have changed the
    // token sum without changing the count, and a recount is always right.
    project_ops::recount_project(conn, &record.project_key, record.created_at)?;
    if let Some(old_key) = previous_key {
        if old_key != record.project_key {
            project_ops::recount_project(conn, &old_key, record.created_at)?;
        }
    }

    Ok(())
}

/// Get a single context record by id.
pub fn get_context(conn: &Connection, id: &str) -> EngramResult<Option<ContextRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, project_key, payload, algorithm, strategy,
                    original_tokens, compressed_tokens, metadata,
                    created_at, last_accessed, access_count
             FROM contexts WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(row_to_context(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(parsed) => Ok(Some(parsed?)),
        None => Ok(None),
    }
}

/// Bump `last_accessed`/`access_count` atomically and return the refreshed
/// record. `None` when the id is unknown.
pub fn update_access(conn: &Connection, id: &str) -> EngramResult<Option<ContextRecord>> {
    let now = Utc::now();
    let rows = conn
        .execute(
            "UPDATE contexts
             SET last_accessed = ?2, access_count = access_count + 1
             WHERE id = ?1",
            params![id, now.to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Ok(None);
    }
    get_context(conn, id)
}

/// One page of a project's records, most recently created first.
pub fn list_by_project(
    conn: &Connection,
    project_key: &str,
    limit: usize,
    offset: usize,
) -> EngramResult<Vec<ContextRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, project_key, payload, algorithm, strategy,
                    original_tokens, compressed_tokens, metadata,
                    created_at, last_accessed, access_count
             FROM contexts
             WHERE project_key = ?1
             ORDER BY created_at DESC
             LIMIT ?2 OFFSET ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_contexts(&mut stmt, params![project_key, limit as i64, offset as i64])
}

/// Delete contexts last accessed before the cutoff; recount every affected
/// project aggregate in the same transaction. Returns count deleted.
pub fn delete_older_than(conn: &Connection, cutoff: DateTime<Utc>) -> EngramResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("delete_older_than begin: {e}")))?;

    let result = (|| {
        let cutoff_str = cutoff.to_rfc3339();
        let mut stmt = tx
            .prepare(
                "SELECT DISTINCT project_key FROM contexts
                 WHERE julianday(last_accessed) < julianday(?1)",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        let affected: Vec<String> = stmt
            .query_map(params![cutoff_str], |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| to_storage_err(e.to_string()))?;
        drop(stmt);

        let deleted = tx
            .execute(
                "DELETE FROM contexts WHERE julianday(last_accessed) < julianday(?1)",
                params![cutoff_str],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;

        let now = Utc::now();
        for key in &affected {
            project_ops::recount_project(&tx, key, now)?;
        }
        Ok(deleted)
    })();

    match result {
        Ok(deleted) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("delete_older_than commit: {e}")))?;
            Ok(deleted)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Run a prepared context SELECT and collect parsed records.
pub(crate) fn collect_contexts(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> EngramResult<Vec<ContextRecord>> {
    let rows = stmt
        .query_map(params, |row| Ok(row_to_context(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Parse a row from the contexts table into a ContextRecord.
pub(crate) fn row_to_context(row: &rusqlite::Row<'_>) -> EngramResult<ContextRecord> {
    let algorithm_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let strategy_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let created_str: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let accessed_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ContextRecord {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        project_key: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        payload: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        algorithm: algorithm_str.parse()?,
        strategy: strategy_str.parse()?,
        original_tokens: row
            .get::<_, i64>(5)
            .map_err(|e| to_storage_err(e.to_string()))? as usize,
        compressed_tokens: row
            .get::<_, i64>(6)
            .map_err(|e| to_storage_err(e.to_string()))? as usize,
        metadata: serde_json::from_str(&metadata_json)
            .map_err(|e| to_storage_err(format!("parse metadata: {e}")))?,
        created_at: parse_dt(&created_str)?,
        last_accessed: parse_dt(&accessed_str)?,
        access_count: row
            .get::<_, i64>(10)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
    })
}

/// Parse an RFC3339 timestamp column.
pub(crate) fn parse_dt(s: &str) -> EngramResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}
