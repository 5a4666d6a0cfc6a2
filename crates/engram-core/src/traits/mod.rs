//! Seam traits between the subsystems. The storage engine and the
//! compression engine are injected through these, so tests can swap in
//! in-memory instances.

mod compressor;
mod storage;

pub use compressor::{CompressedArtifact, ICompressor};
pub use storage::{IContextStorage, IMetricsStorage};
