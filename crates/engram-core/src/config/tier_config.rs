use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::defaults;

/// Hierarchical tier loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Age below which a record is hot (hours).
    pub hot_threshold_hours: u64,
    /// Age below which a record is warm (hours). Must exceed the hot
    /// threshold; `normalized()` enforces this.
    pub warm_threshold_hours: u64,
    /// Hot cache entry bound.
    pub l0_max_entries: usize,
    /// Hot cache payload-byte bound.
    pub l0_max_bytes: usize,
    /// Access count a record must exceed before migration promotes it
    /// into L0.
    pub promotion_threshold: u64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            hot_threshold_hours: defaults::DEFAULT_HOT_THRESHOLD_HOURS,
            warm_threshold_hours: defaults::DEFAULT_WARM_THRESHOLD_HOURS,
            l0_max_entries: defaults::DEFAULT_L0_MAX_ENTRIES,
            l0_max_bytes: defaults::DEFAULT_L0_MAX_BYTES,
            promotion_threshold: defaults::DEFAULT_PROMOTION_THRESHOLD,
        }
    }
}

impl TierConfig {
    /// Hot threshold as a chrono duration.
    pub fn hot_threshold(&self) -> Duration {
        Duration::hours(self.hot_threshold_hours as i64)
    }

    /// Warm threshold as a chrono duration.
    pub fn warm_threshold(&self) -> Duration {
        Duration::hours(self.warm_threshold_hours as i64)
    }

    /// Copy with `warm >= hot` enforced, so tier classification stays a
    /// total ordering even under a misconfigured file.
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.warm_threshold_hours < cfg.hot_threshold_hours {
            cfg.warm_threshold_hours = cfg.hot_threshold_hours;
        }
        cfg
    }
}
