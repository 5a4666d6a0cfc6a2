use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::{APP_DIR_NAME, DB_FILE_NAME};

/// Persistence store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the single shared database file. `None` resolves to
    /// `<platform data dir>/engram/contexts.db`.
    pub db_path: Option<PathBuf>,
    /// Number of read-only connections in the pool.
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}

impl StorageConfig {
    /// Resolve the effective database path, creating nothing.
    /// Falls back to a relative path when the platform data dir is unknown.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(DB_FILE_NAME)
    }
}
