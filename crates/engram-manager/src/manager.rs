//! The `ContextManager` facade.
//!
//! Every public call is async; the underlying SQLite and zstd work is
//! synchronous, so each call moves onto the blocking thread pool and comes
//! back with the result. One manager per process; clones share state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use engram_analytics::{Analytics, MetricsRecorder};
use engram_compression::CompressionEngine;
use engram_core::config::EngramConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{
    CompressOutcome, CompressionStrategy, ContextRecord, DecisionRecord, ImportSummary,
    MigrationReport, ProjectExport, StoreStats, UsageReport,
};
use engram_core::traits::{ICompressor, IContextStorage, IMetricsStorage};
use engram_storage::StorageEngine;
use engram_tiers::TierLoader;
use engram_tokens::TokenCounter;

/// Session id used for metric rows when the caller did not supply one.
const DEFAULT_SESSION: &str = "default";

struct ManagerInner {
    storage: Arc<StorageEngine>,
    loader: TierLoader,
    compressor: CompressionEngine,
    recorder: MetricsRecorder,
    analytics: Analytics,
    default_strategy: CompressionStrategy,
}

/// Facade over the whole subsystem. Cheap to clone; all clones share the
/// same storage engine, hot cache, and token-counter cache.
#[derive(Clone)]
pub struct ContextManager {
    inner: Arc<ManagerInner>,
}

impl ContextManager {
    /// Open (or create) the store at the configured path and wire up the
    /// full pipeline.
    pub fn new(config: EngramConfig) -> EngramResult<Self> {
        let db_path = config.storage.resolve_db_path();
        let storage = Arc::new(StorageEngine::open(
            &db_path,
            config.storage.read_pool_size,
        )?);
        info!(path = %db_path.display(), "context store opened");
        Ok(Self::with_storage(storage, config))
    }

    /// Wire the pipeline onto an already-open storage engine. This is the
    /// injection seam: tests hand in an in-memory engine here.
    pub fn with_storage(storage: Arc<StorageEngine>, config: EngramConfig) -> Self {
        let counter = Arc::new(TokenCounter::new());
        let inner = ManagerInner {
            loader: TierLoader::new(Arc::clone(&storage), &config.tiers),
            compressor: CompressionEngine::new(counter, &config.compression),
            recorder: MetricsRecorder::new(Arc::clone(&storage)),
            analytics: Analytics::new(Arc::clone(&storage), &config.analytics),
            default_strategy: config.compression.default_strategy,
            storage,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Run a synchronous pipeline closure on the blocking pool.
    async fn run<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&ManagerInner) -> EngramResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(|e| EngramError::Task {
                reason: e.to_string(),
            })?
    }

    /// Compress `text` and persist it under `id`. The record is durable
    /// before this returns; the metric write afterwards is best-effort.
    pub async fn compress(
        &self,
        id: impl Into<String>,
        project_key: impl Into<String>,
        text: impl Into<String>,
        strategy: Option<CompressionStrategy>,
        session_id: Option<String>,
        metadata: Option<HashMap<String, String>>,
    ) -> EngramResult<CompressOutcome> {
        let id = id.into();
        let project_key = project_key.into();
        let text = text.into();

        self.run(move |inner| {
            let started = Instant::now();
            let strategy = strategy.unwrap_or(inner.default_strategy);
            let artifact = inner.compressor.compress(&text, strategy)?;

            let now = Utc::now();
            let record = ContextRecord {
                id: id.clone(),
                project_key: project_key.clone(),
                payload: artifact.payload,
                algorithm: artifact.algorithm,
                strategy,
                original_tokens: artifact.original_tokens,
                compressed_tokens: artifact.compressed_tokens,
                metadata: metadata.unwrap_or_default(),
                created_at: now,
                last_accessed: now,
                access_count: 0,
            };
            inner.storage.save(&record)?;

            let ratio = if record.original_tokens == 0 {
                0.0
            } else {
                (1.0 - record.compressed_tokens as f64 / record.original_tokens as f64).max(0.0)
            };
            let outcome = CompressOutcome {
                id: record.id.clone(),
                project_key: record.project_key.clone(),
                algorithm: record.algorithm,
                strategy: record.strategy,
                original_tokens: record.original_tokens,
                compressed_tokens: record.compressed_tokens,
                ratio,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            };

            // A fresh write is by definition hot.
            inner.loader.admit(record);
            inner
                .recorder
                .record(&outcome, session_id.as_deref().unwrap_or(DEFAULT_SESSION));

            debug!(id = %outcome.id, ratio = outcome.ratio, "context compressed");
            Ok(outcome)
        })
        .await
    }

    /// Fetch one record, walking hot → warm → cold. Bumps access
    /// bookkeeping on a hit.
    pub async fn get(&self, id: impl Into<String>) -> EngramResult<Option<ContextRecord>> {
        let id = id.into();
        self.run(move |inner| inner.loader.get(&id)).await
    }

    /// `get` plus decompression back to text. `None` when the id is
    /// unknown; an error only when the stored payload cannot be reversed.
    pub async fn retrieve(&self, id: impl Into<String>) -> EngramResult<Option<String>> {
        let id = id.into();
        self.run(move |inner| {
            let Some(record) = inner.loader.get(&id)? else {
                return Ok(None);
            };
            let text = inner
                .compressor
                .decompress(&record.payload, record.algorithm)?;
            Ok(Some(text))
        })
        .await
    }

    /// Hot-tier snapshot, most recently used first.
    pub async fn list_hot(&self) -> EngramResult<Vec<ContextRecord>> {
        self.run(|inner| Ok(inner.loader.list_hot())).await
    }

    /// Warm-tier records, excluding anything currently hot.
    pub async fn list_warm(&self, limit: usize) -> EngramResult<Vec<ContextRecord>> {
        self.run(move |inner| inner.loader.list_warm(limit)).await
    }

    /// One page of the cold tier, oldest first.
    pub async fn list_cold(
        &self,
        offset: usize,
        limit: usize,
    ) -> EngramResult<Vec<ContextRecord>> {
        self.run(move |inner| inner.loader.lazy_cold(offset, limit))
            .await
    }

    /// Run the tier migration sweep.
    pub async fn migrate_tiers(&self) -> EngramResult<MigrationReport> {
        self.run(|inner| inner.loader.migrate_tiers()).await
    }

    /// Store-wide (or per-project) aggregate stats.
    pub async fn stats(&self, project_key: Option<String>) -> EngramResult<StoreStats> {
        self.run(move |inner| inner.storage.stats(project_key.as_deref()))
            .await
    }

    /// Session / weekly / monthly / all-time usage summaries.
    pub async fn usage_report(&self) -> EngramResult<UsageReport> {
        self.run(|inner| inner.analytics.usage_report()).await
    }

    /// Export one project as a self-contained JSON document.
    pub async fn export_project(&self, project_key: impl Into<String>) -> EngramResult<String> {
        let project_key = project_key.into();
        self.run(move |inner| {
            let export = inner.storage.export_project(&project_key)?;
            Ok(serde_json::to_string_pretty(&export)?)
        })
        .await
    }

    /// Import a previously exported JSON document. All-or-nothing.
    pub async fn import_project(&self, json: impl Into<String>) -> EngramResult<ImportSummary> {
        let json = json.into();
        self.run(move |inner| {
            let export: ProjectExport = serde_json::from_str(&json)?;
            inner.storage.import_project(&export)
        })
        .await
    }

    /// Delete contexts not accessed in `older_than_days`, and apply metric
    /// retention in the same pass. Returns the number of contexts deleted.
    pub async fn cleanup(&self, older_than_days: u64) -> EngramResult<usize> {
        self.run(move |inner| {
            let cutoff = Utc::now() - Duration::days(older_than_days as i64);
            let deleted = inner.storage.delete_older_than(cutoff)?;
            // The cache must not keep serving rows the delete removed.
            inner.loader.evict_older_than(cutoff);
            inner
                .storage
                .delete_metrics_older_than(inner.analytics.retention_cutoff())?;
            info!(deleted, older_than_days, "retention cleanup complete");
            Ok(deleted)
        })
        .await
    }

    /// Delete one project and every context under it. Returns the number
    /// of contexts removed. Export first if the data matters.
    pub async fn purge_project(&self, project_key: impl Into<String>) -> EngramResult<usize> {
        let project_key = project_key.into();
        self.run(move |inner| {
            let victims = inner.loader.list_hot();
            let removed = inner.storage.purge_project(&project_key)?;
            for record in victims {
                if record.project_key == project_key {
                    inner.loader.forget(&record.id);
                }
            }
            info!(%project_key, removed, "project purged");
            Ok(removed)
        })
        .await
    }

    /// Append a decision to the audit trail; returns the stored record.
    pub async fn record_decision(
        &self,
        session_id: impl Into<String>,
        task_id: Option<String>,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        context: impl Into<String>,
    ) -> EngramResult<DecisionRecord> {
        let record = DecisionRecord::new(session_id, task_id, decision, reasoning, context);
        let stored = record.clone();
        self.run(move |inner| {
            inner.storage.record_decision(&stored)?;
            Ok(())
        })
        .await?;
        Ok(record)
    }

    /// Backfill the outcome of an earlier decision. Returns `false` when
    /// the outcome was already set (the trail is append-only).
    pub async fn complete_decision(
        &self,
        id: impl Into<String>,
        outcome: impl Into<String>,
    ) -> EngramResult<bool> {
        let id = id.into();
        let outcome = outcome.into();
        self.run(move |inner| inner.storage.backfill_outcome(&id, &outcome))
            .await
    }

    /// All decisions recorded under one session, oldest first.
    pub async fn session_decisions(
        &self,
        session_id: impl Into<String>,
    ) -> EngramResult<Vec<DecisionRecord>> {
        let session_id = session_id.into();
        self.run(move |inner| inner.storage.decisions_for_session(&session_id))
            .await
    }
}
