//! # engram-tiers
//!
//! Hierarchical tier loader. Classifies context records into hot / warm /
//! cold by recency, keeps the hot tier in a bounded strict-LRU cache, and
//! runs the periodic migration sweep that demotes aged cache entries and
//! promotes frequently accessed records back in.

pub mod hot_cache;
pub mod loader;

pub use hot_cache::HotCache;
pub use loader::TierLoader;
