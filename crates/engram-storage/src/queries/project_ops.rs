//! Project aggregate bookkeeping. Projects are created implicitly on first
//! context write and only removed by an explicit purge.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::ProjectRecord;

use super::context_crud::parse_dt;
use super::OptionalRow;
use crate::to_storage_err;

/// Create the project row if it does not exist yet. The name defaults to
/// the key; callers can rename later via import or tooling.
pub fn ensure_project(conn: &Connection, key: &str, now: DateTime<Utc>) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO projects (key, name, path, context_count, total_tokens, first_seen, last_updated)
         VALUES (?1, ?1, NULL, 0, 0, ?2, ?2)
         ON CONFLICT(key) DO NOTHING",
        params![key, now.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Recompute the aggregate columns from the contexts table. Always correct
/// regardless of how the context set changed.
pub fn recount_project(conn: &Connection, key: &str, now: DateTime<Utc>) -> EngramResult<()> {
    conn.execute(
        "UPDATE projects SET
            context_count = (SELECT COUNT(*) FROM contexts WHERE project_key = ?1),
            total_tokens  = (SELECT COALESCE(SUM(original_tokens), 0)
                             FROM contexts WHERE project_key = ?1),
            last_updated  = ?2
         WHERE key = ?1",
        params![key, now.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get one project record.
pub fn get_project(conn: &Connection, key: &str) -> EngramResult<Option<ProjectRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT key, name, path, context_count, total_tokens, first_seen, last_updated
             FROM projects WHERE key = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![key], |row| Ok(row_to_project(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(parsed) => Ok(Some(parsed?)),
        None => Ok(None),
    }
}

/// All projects, most recently updated first.
pub fn list_projects(conn: &Connection) -> EngramResult<Vec<ProjectRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT key, name, path, context_count, total_tokens, first_seen, last_updated
             FROM projects ORDER BY last_updated DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_project(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Administrative purge: drop the project row and every context under it.
/// Returns the number of contexts removed.
pub fn purge_project(conn: &Connection, key: &str) -> EngramResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("purge_project begin: {e}")))?;

    let result = (|| {
        let deleted = tx
            .execute("DELETE FROM contexts WHERE project_key = ?1", params![key])
            .map_err(|e| to_storage_err(e.to_string()))?;
        tx.execute("DELETE FROM projects WHERE key = ?1", params![key])
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(deleted)
    })();

    match result {
        Ok(deleted) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("purge_project commit: {e}")))?;
            Ok(deleted)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Parse a row from the projects table.
pub(crate) fn row_to_project(row: &rusqlite::Row<'_>) -> EngramResult<ProjectRecord> {
    let first_seen_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let last_updated_str: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ProjectRecord {
        key: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        name: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        path: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        context_count: row
            .get::<_, i64>(3)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        total_tokens: row
            .get::<_, i64>(4)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        first_seen: parse_dt(&first_seen_str)?,
        last_updated: parse_dt(&last_updated_str)?,
    })
}
