//! CompressionEngine — maps strategies to zstd levels, accounts tokens the
//! same way on every path, and falls back to passthrough when compressing
//! would not pay off.

use std::sync::Arc;

use engram_core::config::CompressionConfig;
use engram_core::constants::PAYLOAD_BYTES_PER_TOKEN;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{CompressionAlgorithm, CompressionStrategy};
use engram_core::traits::{CompressedArtifact, ICompressor};
use engram_tokens::TokenCounter;

use crate::condense::condense;

/// zstd level per strategy. Conservative favors speed, aggressive favors
/// ratio (after condensing).
fn zstd_level(strategy: CompressionStrategy) -> i32 {
    match strategy {
        CompressionStrategy::Conservative => 3,
        CompressionStrategy::Balanced => 9,
        CompressionStrategy::Aggressive => 19,
    }
}

pub struct CompressionEngine {
    counter: Arc<TokenCounter>,
    slack_factor: f64,
}

impl CompressionEngine {
    pub fn new(counter: Arc<TokenCounter>, config: &CompressionConfig) -> Self {
        Self {
            counter,
            slack_factor: config.slack_factor,
        }
    }

    /// Token-equivalent of a binary payload: `ceil(bytes / 4)`. Applied on
    /// every path (zstd, condensed, passthrough) so ratios are comparable.
    fn payload_tokens(payload: &[u8]) -> usize {
        payload.len().div_ceil(PAYLOAD_BYTES_PER_TOKEN)
    }

    fn passthrough(&self, text: &str, original_tokens: usize) -> CompressedArtifact {
        let payload = text.as_bytes().to_vec();
        let compressed_tokens = Self::payload_tokens(&payload);
        CompressedArtifact {
            payload,
            algorithm: CompressionAlgorithm::Passthrough,
            original_tokens,
            compressed_tokens,
        }
    }
}

impl ICompressor for CompressionEngine {
    fn compress(
        &self,
        text: &str,
        strategy: CompressionStrategy,
    ) -> EngramResult<CompressedArtifact> {
        let original_tokens = self.counter.count_cached(text);
        if text.is_empty() {
            return Ok(self.passthrough(text, original_tokens));
        }

        let (input, algorithm) = match strategy {
            CompressionStrategy::Aggressive => {
                (condense(text), CompressionAlgorithm::CondensedZstd)
            }
            _ => (text.to_string(), CompressionAlgorithm::Zstd),
        };

        let payload = match zstd::encode_all(input.as_bytes(), zstd_level(strategy)) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Compression is best-effort; store the raw text instead.
                tracing::warn!(strategy = %strategy, error = %e, "zstd failed, passthrough");
                return Ok(self.passthrough(text, original_tokens));
            }
        };

        let compressed_tokens = Self::payload_tokens(&payload);
        if compressed_tokens as f64 > original_tokens as f64 * self.slack_factor {
            // The artifact expanded past the slack bound (tiny or
            // high-entropy input). Ratio ~0 beats a negative one.
            return Ok(self.passthrough(text, original_tokens));
        }

        Ok(CompressedArtifact {
            payload,
            algorithm,
            original_tokens,
            compressed_tokens,
        })
    }

    fn decompress(
        &self,
        payload: &[u8],
        algorithm: CompressionAlgorithm,
    ) -> EngramResult<String> {
        let bytes = match algorithm {
            CompressionAlgorithm::Passthrough => payload.to_vec(),
            CompressionAlgorithm::Zstd | CompressionAlgorithm::CondensedZstd => {
                zstd::decode_all(payload).map_err(|e| EngramError::DecompressionFailed {
                    algorithm: algorithm.as_str().to_string(),
                    reason: e.to_string(),
                })?
            }
        };
        String::from_utf8(bytes).map_err(|e| EngramError::DecompressionFailed {
            algorithm: algorithm.as_str().to_string(),
            reason: e.to_string(),
        })
    }
}
