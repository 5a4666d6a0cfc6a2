//! StorageEngine — owns the ConnectionPool, implements IContextStorage +
//! IMetricsStorage, runs migrations on open.

use std::path::Path;

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;
use engram_core::models::{
    CompressionMetric, ContextRecord, DecisionRecord, ImportSummary, MetricsSummary,
    ProjectExport, ProjectRecord, StoreStats,
};
use engram_core::traits::{IContextStorage, IMetricsStorage};

use crate::migrations;
use crate::pool::ConnectionPool;

/// The main storage engine. Owns the connection pool and provides the full
/// IContextStorage + IMetricsStorage interface. Open once per process and
/// share via `Arc` — callers never open their own handle.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, read_pool_size: usize) -> EngramResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). Reads route through
    /// the writer — an in-memory read pool would be isolated databases.
    pub fn open_in_memory() -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations.
    fn initialize(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(migrations::run_migrations)
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EngramResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }

    /// Administrative purge of one project and all its contexts. The
    /// export-then-purge flow is the only sanctioned project deletion.
    pub fn purge_project(&self, key: &str) -> EngramResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::project_ops::purge_project(conn, key))
    }
}

impl IContextStorage for StorageEngine {
    fn save(&self, record: &ContextRecord) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::context_crud::save_context(conn, record))
    }

    fn get(&self, id: &str) -> EngramResult<Option<ContextRecord>> {
        self.with_reader(|conn| crate::queries::context_crud::get_context(conn, id))
    }

    fn list_by_project(
        &self,
        project_key: &str,
        limit: usize,
        offset: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.with_reader(|conn| {
            crate::queries::context_crud::list_by_project(conn, project_key, limit, offset)
        })
    }

    fn update_access(&self, id: &str) -> EngramResult<Option<ContextRecord>> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::context_crud::update_access(conn, id))
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> EngramResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::context_crud::delete_older_than(conn, cutoff))
    }

    fn get_project(&self, key: &str) -> EngramResult<Option<ProjectRecord>> {
        self.with_reader(|conn| crate::queries::project_ops::get_project(conn, key))
    }

    fn list_projects(&self) -> EngramResult<Vec<ProjectRecord>> {
        self.with_reader(crate::queries::project_ops::list_projects)
    }

    fn list_accessed_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.with_reader(|conn| crate::queries::tier_query::list_accessed_since(conn, cutoff, limit))
    }

    fn list_accessed_between(
        &self,
        older: DateTime<Utc>,
        newer: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.with_reader(|conn| {
            crate::queries::tier_query::list_accessed_between(conn, older, newer, limit)
        })
    }

    fn list_cold_page(
        &self,
        cutoff: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.with_reader(|conn| {
            crate::queries::tier_query::list_cold_page(conn, cutoff, offset, limit)
        })
    }

    fn promotion_candidates(
        &self,
        threshold: u64,
        hot_cutoff: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.with_reader(|conn| {
            crate::queries::tier_query::promotion_candidates(conn, threshold, hot_cutoff, limit)
        })
    }

    fn stats(&self, project_key: Option<&str>) -> EngramResult<StoreStats> {
        self.with_reader(|conn| crate::queries::aggregation::stats(conn, project_key))
    }

    fn export_project(&self, project_key: &str) -> EngramResult<ProjectExport> {
        self.with_reader(|conn| crate::export::export_project(conn, project_key))
    }

    fn import_project(&self, export: &ProjectExport) -> EngramResult<ImportSummary> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::export::import_project(conn, export))
    }

    fn vacuum(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(crate::queries::maintenance::full_vacuum)
    }

    fn wal_checkpoint(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(crate::queries::maintenance::wal_checkpoint)
    }

    fn integrity_check(&self) -> EngramResult<bool> {
        self.pool
            .writer
            .with_conn_sync(crate::queries::maintenance::integrity_check)
    }
}

impl IMetricsStorage for StorageEngine {
    fn record_metric(&self, metric: &CompressionMetric) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::metric_ops::insert_metric(conn, metric))
    }

    fn metrics_summary(&self, since: Option<DateTime<Utc>>) -> EngramResult<MetricsSummary> {
        self.with_reader(|conn| crate::queries::metric_ops::summarize(conn, since))
    }

    fn delete_metrics_older_than(&self, cutoff: DateTime<Utc>) -> EngramResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::metric_ops::delete_older_than(conn, cutoff))
    }

    fn record_decision(&self, decision: &DecisionRecord) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::decision_ops::insert_decision(conn, decision))
    }

    fn backfill_outcome(&self, id: &str, outcome: &str) -> EngramResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::decision_ops::backfill_outcome(conn, id, outcome))
    }

    fn decisions_for_session(&self, session_id: &str) -> EngramResult<Vec<DecisionRecord>> {
        self.with_reader(|conn| crate::queries::decision_ops::list_by_session(conn, session_id))
    }
}
