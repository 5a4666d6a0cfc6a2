//! Derived report structs returned by public operations. All of them are
//! zero-safe: an empty store yields zeroed values, never an error.

use serde::{Deserialize, Serialize};

use super::compression::{CompressionAlgorithm, CompressionStrategy};

/// Summary returned by `compress` — what the caller needs to show the
/// user without re-reading the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressOutcome {
    pub id: String,
    pub project_key: String,
    pub algorithm: CompressionAlgorithm,
    pub strategy: CompressionStrategy,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    pub ratio: f64,
    pub elapsed_ms: f64,
}

/// Store-wide (or per-project) aggregate over context records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub context_count: u64,
    pub project_count: u64,
    pub total_original_tokens: u64,
    pub total_compressed_tokens: u64,
    pub average_ratio: f64,
}

/// Aggregate over compression metrics within one rolling window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub operations: u64,
    pub total_original_tokens: u64,
    pub total_compressed_tokens: u64,
    pub tokens_saved: u64,
    pub average_ratio: f64,
    pub average_elapsed_ms: f64,
    pub cost_saved_usd: f64,
}

/// The three rolling windows plus the lifetime total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub session: MetricsSummary,
    pub weekly: MetricsSummary,
    pub monthly: MetricsSummary,
    pub all_time: MetricsSummary,
}

/// Result of one tier-migration sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Records admitted into the hot cache.
    pub promoted: usize,
    /// Cache entries dropped because their age crossed the hot threshold.
    pub demoted: usize,
}

/// Result of an `import_project` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub project_key: String,
    pub contexts_imported: usize,
    /// Ids that already existed and were replaced rather than inserted.
    pub replaced: usize,
}
