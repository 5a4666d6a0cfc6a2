//! # engram-manager
//!
//! The public facade of the Engram context memory. One `ContextManager`
//! per process owns the storage engine, the compression engine, the tier
//! loader, and the analytics pipeline, and exposes a small async API on
//! top of them.

pub mod manager;

pub use manager::ContextManager;
