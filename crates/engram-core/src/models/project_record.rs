use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-project aggregate bookkeeping. Upserted in the same transaction as
/// every context write for that key; never implicitly deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// The opaque scoping key contexts are grouped by.
    pub key: String,
    /// Human-readable name; defaults to the key.
    pub name: String,
    /// Optional filesystem path of the workspace this key represents.
    pub path: Option<String>,
    /// Number of context records currently stored under this key.
    pub context_count: u64,
    /// Sum of `original_tokens` across those records.
    pub total_tokens: u64,
    /// First context write for this key.
    pub first_seen: DateTime<Utc>,
    /// Most recent context write.
    pub last_updated: DateTime<Utc>,
}
