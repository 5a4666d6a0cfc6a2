//! Data model: records persisted by the store plus the derived report
//! structs returned by public operations.

mod compression;
mod compression_metric;
mod context_record;
mod decision_record;
mod export;
mod project_record;
mod reports;
mod tier;

pub use compression::{CompressionAlgorithm, CompressionStrategy};
pub use compression_metric::CompressionMetric;
pub use context_record::ContextRecord;
pub use decision_record::DecisionRecord;
pub use export::ProjectExport;
pub use project_record::ProjectRecord;
pub use reports::{
    CompressOutcome, ImportSummary, MetricsSummary, MigrationReport, StoreStats, UsageReport,
};
pub use tier::Tier;
