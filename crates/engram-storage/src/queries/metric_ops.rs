//! Append-only compression metrics: one insert per compress call, window
//! aggregation on demand, bulk retention cleanup.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{CompressionMetric, MetricsSummary};

use crate::to_storage_err;

/// Append one metric row.
pub fn insert_metric(conn: &Connection, metric: &CompressionMetric) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO compression_metrics (
            context_id, session_id, original_tokens, compressed_tokens,
            ratio, elapsed_ms, algorithm, strategy, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            metric.context_id,
            metric.session_id,
            metric.original_tokens as i64,
            metric.compressed_tokens as i64,
            metric.ratio,
            metric.elapsed_ms,
            metric.algorithm.as_str(),
            metric.strategy.as_str(),
            metric.timestamp.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Aggregate rows at or after `since` (`None` = all time). The windows are
/// always computed from the raw rows, never from maintained counters, so
/// they cannot drift. Zero rows yield a zeroed summary.
///
/// `cost_saved_usd` is left at zero; pricing is an analytics concern.
pub fn summarize(conn: &Connection, since: Option<DateTime<Utc>>) -> EngramResult<MetricsSummary> {
    let (sql, since_str);
    match since {
        Some(cutoff) => {
            since_str = cutoff.to_rfc3339();
            sql = "SELECT COUNT(*),
                          COALESCE(SUM(original_tokens), 0),
                          COALESCE(SUM(compressed_tokens), 0),
                          COALESCE(AVG(ratio), 0),
                          COALESCE(AVG(elapsed_ms), 0)
                   FROM compression_metrics
                   WHERE julianday(timestamp) >= julianday(?1)";
        }
        None => {
            since_str = String::new();
            sql = "SELECT COUNT(*),
                          COALESCE(SUM(original_tokens), 0),
                          COALESCE(SUM(compressed_tokens), 0),
                          COALESCE(AVG(ratio), 0),
                          COALESCE(AVG(elapsed_ms), 0)
                   FROM compression_metrics";
        }
    }

    let row = if since.is_some() {
        conn.query_row(sql, params![since_str], parse_summary_row)
    } else {
        conn.query_row(sql, [], parse_summary_row)
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(row)
}

fn parse_summary_row(row: &rusqlite::Row<'_>) -> Result<MetricsSummary, rusqlite::Error> {
    let operations: i64 = row.get(0)?;
    let total_original: i64 = row.get(1)?;
    let total_compressed: i64 = row.get(2)?;
    let average_ratio: f64 = row.get(3)?;
    let average_elapsed_ms: f64 = row.get(4)?;
    Ok(MetricsSummary {
        operations: operations as u64,
        total_original_tokens: total_original as u64,
        total_compressed_tokens: total_compressed as u64,
        tokens_saved: (total_original - total_compressed).max(0) as u64,
        average_ratio,
        average_elapsed_ms,
        cost_saved_usd: 0.0,
    })
}

/// Bulk retention cleanup. Returns the number of rows removed.
pub fn delete_older_than(conn: &Connection, cutoff: DateTime<Utc>) -> EngramResult<usize> {
    conn.execute(
        "DELETE FROM compression_metrics WHERE julianday(timestamp) < julianday(?1)",
        params![cutoff.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
