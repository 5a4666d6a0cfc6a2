//! Error taxonomy. `EngramError` is the top-level error every public
//! operation returns; subsystem errors convert into it via `From`.

mod storage_error;

pub use storage_error::StorageError;

/// Convenience alias used across the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

/// Top-level error for the Engram context memory.
///
/// Not-found on a plain `get` is NOT an error — those paths return
/// `Ok(None)`. `ContextNotFound` is reserved for operations that require
/// the record to exist (e.g. decompressing by id).
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("context not found: {id}")]
    ContextNotFound { id: String },

    #[error("project not found: {key}")]
    ProjectNotFound { key: String },

    #[error("import rejected: {reason}")]
    ImportRejected { reason: String },

    #[error("invalid strategy: {name}")]
    InvalidStrategy { name: String },

    #[error("invalid algorithm: {name}")]
    InvalidAlgorithm { name: String },

    #[error("decompression failed ({algorithm}): {reason}")]
    DecompressionFailed { algorithm: String, reason: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("background task failed: {reason}")]
    Task { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngramError {
    /// True when the failure means the underlying store is unavailable and
    /// the whole subsystem should be reported as degraded.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, EngramError::Storage(_))
    }
}
