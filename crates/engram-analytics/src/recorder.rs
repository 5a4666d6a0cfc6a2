//! Best-effort metric recording.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use engram_core::models::{CompressOutcome, CompressionMetric};
use engram_core::traits::IMetricsStorage;
use engram_storage::StorageEngine;

/// Writes one metric row per compress operation. A storage failure here is
/// logged and swallowed: metrics must never fail the operation they
/// measure.
pub struct MetricsRecorder {
    storage: Arc<StorageEngine>,
}

impl MetricsRecorder {
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self { storage }
    }

    /// Record the metric row for a finished compress call.
    pub fn record(&self, outcome: &CompressOutcome, session_id: &str) {
        let metric = CompressionMetric {
            context_id: outcome.id.clone(),
            session_id: session_id.to_string(),
            original_tokens: outcome.original_tokens,
            compressed_tokens: outcome.compressed_tokens,
            ratio: outcome.ratio,
            elapsed_ms: outcome.elapsed_ms,
            algorithm: outcome.algorithm,
            strategy: outcome.strategy,
            timestamp: Utc::now(),
        };

        if let Err(e) = self.storage.record_metric(&metric) {
            warn!(context_id = %metric.context_id, error = %e, "failed to record compression metric");
        }
    }
}
