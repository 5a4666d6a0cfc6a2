//! # engram-core
//!
//! Foundation crate for the Engram context memory system.
//! Defines all models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EngramConfig;
pub use errors::{EngramError, EngramResult};
pub use models::{
    CompressionAlgorithm, CompressionMetric, CompressionStrategy, ContextRecord, ProjectRecord,
    Tier,
};
