use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TierConfig;

/// Latency/recency classification of a context record. Computed from
/// `last_accessed` at read time — never persisted, so reconfiguring the
/// thresholds can never leave stale tier state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// L0 — accessed within the hot threshold; served from memory.
    Hot,
    /// L1 — accessed within the warm threshold; served by indexed query.
    Warm,
    /// L2 — everything older; served only by explicit pagination.
    Cold,
}

impl Tier {
    /// Classify an access timestamp against the configured thresholds.
    pub fn classify(last_accessed: DateTime<Utc>, now: DateTime<Utc>, config: &TierConfig) -> Tier {
        let age = now - last_accessed;
        if age <= config.hot_threshold() {
            Tier::Hot
        } else if age <= config.warm_threshold() {
            Tier::Warm
        } else {
            Tier::Cold
        }
    }
}
