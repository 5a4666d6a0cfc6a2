use serde::{Deserialize, Serialize};

use crate::errors::EngramError;

/// Caller-selectable aggressiveness level. Trades fidelity for ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionStrategy {
    /// Byte-exact, light compression.
    Conservative,
    /// Byte-exact, stronger compression. The default.
    #[default]
    Balanced,
    /// Lossy: content is condensed before compressing. Best ratio.
    Aggressive,
}

impl CompressionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionStrategy::Conservative => "conservative",
            CompressionStrategy::Balanced => "balanced",
            CompressionStrategy::Aggressive => "aggressive",
        }
    }
}

impl std::str::FromStr for CompressionStrategy {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(CompressionStrategy::Conservative),
            "balanced" => Ok(CompressionStrategy::Balanced),
            "aggressive" => Ok(CompressionStrategy::Aggressive),
            other => Err(EngramError::InvalidStrategy {
                name: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which method produced a stored payload. Decompression dispatches on this,
/// so it is persisted verbatim with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionAlgorithm {
    /// Plain zstd over the raw text.
    Zstd,
    /// Lossy condensing followed by zstd.
    CondensedZstd,
    /// Raw UTF-8 bytes, stored when compression would not pay off.
    Passthrough,
}

impl CompressionAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Zstd => "zstd",
            CompressionAlgorithm::CondensedZstd => "condensed_zstd",
            CompressionAlgorithm::Passthrough => "passthrough",
        }
    }

    /// Whether `decompress` returns the original text byte-for-byte.
    pub fn is_lossless(&self) -> bool {
        !matches!(self, CompressionAlgorithm::CondensedZstd)
    }
}

impl std::str::FromStr for CompressionAlgorithm {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "condensed_zstd" => Ok(CompressionAlgorithm::CondensedZstd),
            "passthrough" => Ok(CompressionAlgorithm::Passthrough),
            other => Err(EngramError::InvalidAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
