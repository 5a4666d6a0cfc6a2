use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compression::{CompressionAlgorithm, CompressionStrategy};

/// One row per compress operation. Append-only; only bulk retention
/// cleanup ever deletes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionMetric {
    pub context_id: String,
    pub session_id: String,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    /// Savings ratio at write time (`1 - compressed/original`).
    pub ratio: f64,
    /// Wall time of the compress call in milliseconds.
    pub elapsed_ms: f64,
    pub algorithm: CompressionAlgorithm,
    pub strategy: CompressionStrategy,
    pub timestamp: DateTime<Utc>,
}

impl CompressionMetric {
    /// Tokens the operation saved (zero when the payload expanded).
    pub fn tokens_saved(&self) -> usize {
        self.original_tokens.saturating_sub(self.compressed_tokens)
    }
}
