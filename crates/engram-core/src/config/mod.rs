//! Configuration: serde-default structs per subsystem, aggregated into
//! [`EngramConfig`]. A TOML file only needs to name what it changes.

pub mod defaults;

mod analytics_config;
mod compression_config;
mod storage_config;
mod tier_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use analytics_config::AnalyticsConfig;
pub use compression_config::CompressionConfig;
pub use storage_config::StorageConfig;
pub use tier_config::TierConfig;

use crate::errors::{EngramError, EngramResult};

/// Top-level configuration for the whole subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub storage: StorageConfig,
    pub tiers: TierConfig,
    pub compression: CompressionConfig,
    pub analytics: AnalyticsConfig,
}

impl EngramConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> EngramResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EngramError::Config {
            reason: format!("read {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| EngramError::Config {
            reason: format!("parse {}: {e}", path.display()),
        })
    }
}
