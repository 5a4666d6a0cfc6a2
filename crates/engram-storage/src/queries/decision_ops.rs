//! Decision audit trail: append-only inserts plus the single permitted
//! mutation, the outcome backfill.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::DecisionRecord;

use super::context_crud::parse_dt;
use crate::to_storage_err;

/// Append a decision row.
pub fn insert_decision(conn: &Connection, decision: &DecisionRecord) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO decisions (
            id, session_id, task_id, decision, reasoning, context, outcome, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            decision.id,
            decision.session_id,
            decision.task_id,
            decision.decision,
            decision.reasoning,
            decision.context,
            decision.outcome,
            decision.timestamp.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Backfill the outcome. Only fills an empty outcome — the trail stays
/// append-only otherwise. Returns false when no row was updated.
pub fn backfill_outcome(conn: &Connection, id: &str, outcome: &str) -> EngramResult<bool> {
    let rows = conn
        .execute(
            "UPDATE decisions SET outcome = ?2 WHERE id = ?1 AND outcome IS NULL",
            params![id, outcome],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

/// All decisions for a session, oldest first.
pub fn list_by_session(conn: &Connection, session_id: &str) -> EngramResult<Vec<DecisionRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, session_id, task_id, decision, reasoning, context, outcome, timestamp
             FROM decisions WHERE session_id = ?1 ORDER BY timestamp ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![session_id], |row| Ok(row_to_decision(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Parse a row from the decisions table.
fn row_to_decision(row: &rusqlite::Row<'_>) -> EngramResult<DecisionRecord> {
    let timestamp_str: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(DecisionRecord {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        session_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        task_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        decision: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        reasoning: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        context: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        outcome: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        timestamp: parse_dt(&timestamp_str)?,
    })
}
