use serde::{Deserialize, Serialize};

use super::defaults;

/// Metrics & analytics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Estimated price per 1000 tokens for the cost-saved figure.
    pub cost_per_1k_tokens: f64,
    /// Trailing window treated as the current session (hours).
    pub session_window_hours: u64,
    /// Metric rows older than this are removed by retention cleanup (days).
    pub metric_retention_days: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            cost_per_1k_tokens: defaults::DEFAULT_COST_PER_1K_TOKENS,
            session_window_hours: defaults::DEFAULT_SESSION_WINDOW_HOURS,
            metric_retention_days: defaults::DEFAULT_METRIC_RETENTION_DAYS,
        }
    }
}
