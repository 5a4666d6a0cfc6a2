use crate::errors::EngramResult;
use crate::models::{CompressionAlgorithm, CompressionStrategy};

/// Output of one compress call, before it is persisted as a record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedArtifact {
    /// Opaque bytes; only the producing algorithm can read them back.
    pub payload: Vec<u8>,
    /// Algorithm that actually ran — may be `Passthrough` even when the
    /// caller asked for an aggressive strategy (fallback).
    pub algorithm: CompressionAlgorithm,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
}

impl CompressedArtifact {
    /// Savings ratio `1 - compressed/original`, clamped at zero.
    pub fn ratio(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        (1.0 - self.compressed_tokens as f64 / self.original_tokens as f64).max(0.0)
    }
}

/// Pluggable compression strategy surface. Compression is best-effort:
/// `compress` must not fail on malformed or incompressible input — it
/// falls back to a passthrough artifact instead.
pub trait ICompressor: Send + Sync {
    fn compress(
        &self,
        text: &str,
        strategy: CompressionStrategy,
    ) -> EngramResult<CompressedArtifact>;

    /// Reverse a payload. Byte-exact for lossless algorithms; for the
    /// lossy condensed algorithm this returns the condensed text.
    fn decompress(&self, payload: &[u8], algorithm: CompressionAlgorithm)
        -> EngramResult<String>;
}
