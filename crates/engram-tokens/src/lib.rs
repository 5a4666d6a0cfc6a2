//! # engram-tokens
//!
//! Token counting for ratio accounting. One counter instance is shared by
//! the compression engine and analytics so both sides of a round trip use
//! the same counting method.

mod counter;

pub use counter::TokenCounter;
