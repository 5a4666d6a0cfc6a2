//! # engram-compression
//!
//! The compression engine: three caller-selectable strategies over zstd,
//! a lossy condenser for the aggressive level, and a passthrough fallback
//! so compression is never a correctness requirement.

mod condense;
mod engine;

pub use condense::condense;
pub use engine::CompressionEngine;
