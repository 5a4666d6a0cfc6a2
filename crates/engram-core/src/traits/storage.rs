use chrono::{DateTime, Utc};

use crate::errors::EngramResult;
use crate::models::{
    CompressionMetric, ContextRecord, DecisionRecord, ImportSummary, MetricsSummary,
    ProjectExport, ProjectRecord, StoreStats,
};

/// Durable storage for context records and project aggregates.
/// CRUD + access bookkeeping + tier queries + export/import + maintenance.
pub trait IContextStorage: Send + Sync {
    // --- CRUD ---
    /// Insert-or-replace by id; upserts the project aggregate in the same
    /// transaction.
    fn save(&self, record: &ContextRecord) -> EngramResult<()>;
    fn get(&self, id: &str) -> EngramResult<Option<ContextRecord>>;
    fn list_by_project(
        &self,
        project_key: &str,
        limit: usize,
        offset: usize,
    ) -> EngramResult<Vec<ContextRecord>>;
    /// Atomically bump `last_accessed` to now and `access_count` by one.
    /// Returns the refreshed record, or `None` if the id is unknown.
    fn update_access(&self, id: &str) -> EngramResult<Option<ContextRecord>>;
    /// Delete contexts whose `last_accessed` is older than the cutoff,
    /// recounting project aggregates in the same transaction.
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> EngramResult<usize>;

    // --- Projects ---
    fn get_project(&self, key: &str) -> EngramResult<Option<ProjectRecord>>;
    fn list_projects(&self) -> EngramResult<Vec<ProjectRecord>>;

    // --- Tier queries (the three indexed predicates) ---
    /// Records accessed at or after `cutoff`, most recent first.
    fn list_accessed_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>>;
    /// Records accessed in `[older, newer)`, most recent first.
    fn list_accessed_between(
        &self,
        older: DateTime<Utc>,
        newer: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>>;
    /// One page of records accessed before `cutoff`, oldest first.
    fn list_cold_page(
        &self,
        cutoff: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>>;
    /// Records outside the hot window whose access count strictly exceeds
    /// the promotion threshold.
    fn promotion_candidates(
        &self,
        threshold: u64,
        hot_cutoff: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>>;

    // --- Aggregation ---
    /// Zero-safe; scoped to one project when a key is given.
    fn stats(&self, project_key: Option<&str>) -> EngramResult<StoreStats>;

    // --- Export / import ---
    fn export_project(&self, project_key: &str) -> EngramResult<ProjectExport>;
    /// All-or-nothing: any invalid record rejects the whole document.
    fn import_project(&self, export: &ProjectExport) -> EngramResult<ImportSummary>;

    // --- Maintenance ---
    fn vacuum(&self) -> EngramResult<()>;
    fn wal_checkpoint(&self) -> EngramResult<()>;
    fn integrity_check(&self) -> EngramResult<bool>;
}

/// Append-only telemetry storage: compression metrics and the decision
/// audit trail.
pub trait IMetricsStorage: Send + Sync {
    fn record_metric(&self, metric: &CompressionMetric) -> EngramResult<()>;
    /// Aggregate over rows at or after `since`; `None` means all time.
    /// Zero rows yield a zeroed summary.
    fn metrics_summary(&self, since: Option<DateTime<Utc>>) -> EngramResult<MetricsSummary>;
    fn delete_metrics_older_than(&self, cutoff: DateTime<Utc>) -> EngramResult<usize>;

    fn record_decision(&self, decision: &DecisionRecord) -> EngramResult<()>;
    /// The single permitted mutation: backfill the outcome once known.
    fn backfill_outcome(&self, id: &str, outcome: &str) -> EngramResult<bool>;
    fn decisions_for_session(&self, session_id: &str) -> EngramResult<Vec<DecisionRecord>>;
}
