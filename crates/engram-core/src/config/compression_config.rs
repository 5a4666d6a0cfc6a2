use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::CompressionStrategy;

/// Compression engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Strategy used when a caller does not pick one.
    pub default_strategy: CompressionStrategy,
    /// Passthrough fallback kicks in when the artifact's token-equivalent
    /// exceeds `original_tokens * slack_factor`.
    pub slack_factor: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_strategy: CompressionStrategy::Balanced,
            slack_factor: defaults::DEFAULT_SLACK_FACTOR,
        }
    }
}
