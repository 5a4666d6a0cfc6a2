//! # engram-analytics
//!
//! Compression metrics and usage reporting. The recorder is fire-and-forget
//! so a metrics failure can never fail the operation being measured; the
//! analytics side is pure filtered aggregation over the stored rows.

pub mod analytics;
pub mod recorder;

pub use analytics::Analytics;
pub use recorder::MetricsRecorder;
