use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compression::{CompressionAlgorithm, CompressionStrategy};

/// One compressed unit of conversational context plus its accounting
/// metadata. The raw text is never stored — only the opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRecord {
    /// Unique identifier, store-wide (not just per project). Immutable.
    pub id: String,
    /// Opaque key grouping records into a logical project/workspace.
    pub project_key: String,
    /// Compressed artifact. Opaque to the store.
    #[serde(with = "payload_base64")]
    pub payload: Vec<u8>,
    /// Method that produced the payload; decompression dispatches on it.
    pub algorithm: CompressionAlgorithm,
    /// Aggressiveness level the caller selected.
    pub strategy: CompressionStrategy,
    /// Token count of the original text.
    pub original_tokens: usize,
    /// Token-equivalent of the stored payload.
    pub compressed_tokens: usize,
    /// Free-form caller annotations.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Set once at write time. Immutable.
    pub created_at: DateTime<Utc>,
    /// Updated on every successful read; drives tier classification.
    pub last_accessed: DateTime<Utc>,
    /// Incremented on every successful read; promotion signal.
    pub access_count: u64,
}

impl ContextRecord {
    /// Savings ratio `1 - compressed/original`. Zero for empty input and
    /// clamped at zero when a pathological payload expanded.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        let ratio = 1.0 - self.compressed_tokens as f64 / self.original_tokens as f64;
        ratio.max(0.0)
    }

    /// Payload size in bytes; the hot cache budgets on this.
    pub fn payload_bytes(&self) -> usize {
        self.payload.len()
    }

    /// Age relative to `now`, measured from the last access.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_accessed
    }
}

/// Payloads are binary; serde them as base64 so export documents stay
/// valid JSON.
mod payload_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
