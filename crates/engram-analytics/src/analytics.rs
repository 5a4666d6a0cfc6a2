//! Rolling-window usage reports over the stored metric rows.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use engram_core::config::AnalyticsConfig;
use engram_core::errors::EngramResult;
use engram_core::models::{MetricsSummary, UsageReport};
use engram_core::traits::IMetricsStorage;
use engram_storage::StorageEngine;

/// Computes usage summaries as filtered SQL aggregation — never from
/// counters maintained in memory, so a restart loses nothing.
pub struct Analytics {
    storage: Arc<StorageEngine>,
    config: AnalyticsConfig,
}

impl Analytics {
    pub fn new(storage: Arc<StorageEngine>, config: &AnalyticsConfig) -> Self {
        Self {
            storage,
            config: config.clone(),
        }
    }

    /// One summary for an explicit window start (`None` = all time).
    pub fn summary_since(&self, since: Option<DateTime<Utc>>) -> EngramResult<MetricsSummary> {
        let mut summary = self.storage.metrics_summary(since)?;
        summary.cost_saved_usd =
            summary.tokens_saved as f64 / 1000.0 * self.config.cost_per_1k_tokens;
        Ok(summary)
    }

    /// The full report: session / weekly / monthly / all-time windows.
    pub fn usage_report(&self) -> EngramResult<UsageReport> {
        let now = Utc::now();
        let session_start = now - Duration::hours(self.config.session_window_hours as i64);

        Ok(UsageReport {
            session: self.summary_since(Some(session_start))?,
            weekly: self.summary_since(Some(now - Duration::days(7)))?,
            monthly: self.summary_since(Some(now - Duration::days(30)))?,
            all_time: self.summary_since(None)?,
        })
    }

    /// Cutoff before which metric rows are eligible for retention cleanup.
    pub fn retention_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::days(self.config.metric_retention_days as i64)
    }
}
