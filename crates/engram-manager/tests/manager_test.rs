use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, Utc};
use engram_core::config::{EngramConfig, StorageConfig, TierConfig};
use engram_core::models::{
    CompressionAlgorithm, CompressionStrategy, ContextRecord, Tier,
};
use engram_core::traits::IContextStorage;
use engram_manager::ContextManager;
use engram_storage::StorageEngine;

fn manager() -> (Arc<StorageEngine>, ContextManager) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let manager = ContextManager::with_storage(Arc::clone(&storage), EngramConfig::default());
    (storage, manager)
}

fn backdated(id: &str, accessed_days_ago: i64, access_count: u64) -> ContextRecord {
    let accessed = Utc::now() - Duration::days(accessed_days_ago);
    ContextRecord {
        id: id.to_string(),
        project_key: "proj-a".to_string(),
        payload: format!("payload for {id}").into_bytes(),
        algorithm: CompressionAlgorithm::Passthrough,
        strategy: CompressionStrategy::Balanced,
        original_tokens: 100,
        compressed_tokens: 40,
        metadata: HashMap::new(),
        created_at: accessed - Duration::hours(1),
        last_accessed: accessed,
        access_count,
    }
}

const SAMPLE: &str = "fn main() {\n    println!(\"hello\");\n}\n\
    // a realistic chunk of source text, repeated enough to compress\n\
    fn main() {\n    println!(\"hello\");\n}\n";

// ── Compress / retrieve ───────────────────────────────────────────────────

#[tokio::test]
async fn compress_then_retrieve_round_trips() {
    let (_storage, manager) = manager();
    let outcome = manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();
    assert_eq!(outcome.strategy, CompressionStrategy::Balanced);
    assert!(outcome.ratio >= 0.0);

    let text = manager.retrieve("ctx-1").await.unwrap().unwrap();
    assert_eq!(text, SAMPLE);
}

#[tokio::test]
async fn compress_persists_before_returning() {
    let (storage, manager) = manager();
    manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();

    // Visible through the raw storage handle, not just the cache.
    let record = storage.get("ctx-1").unwrap().unwrap();
    assert_eq!(record.project_key, "proj-a");
    assert!(record.last_accessed >= record.created_at);
}

#[tokio::test]
async fn aggressive_strategy_is_lossy_but_preserves_condensed_text() {
    let (_storage, manager) = manager();
    let messy = "line one   \n\n\n\nline two\nline two\n".repeat(50);
    let outcome = manager
        .compress(
            "ctx-1",
            "proj-a",
            messy.as_str(),
            Some(CompressionStrategy::Aggressive),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.algorithm, CompressionAlgorithm::CondensedZstd);

    let text = manager.retrieve("ctx-1").await.unwrap().unwrap();
    assert!(text.contains("line one"));
    assert!(text.contains("line two"));
    assert!(!text.contains("   \n"));
    assert!(text.len() < messy.len());
}

#[tokio::test]
async fn tiny_input_falls_back_to_passthrough() {
    let (_storage, manager) = manager();
    let outcome = manager
        .compress("ctx-1", "proj-a", "hi", None, None, None)
        .await
        .unwrap();
    assert_eq!(outcome.algorithm, CompressionAlgorithm::Passthrough);
    assert_eq!(outcome.ratio, 0.0);
    assert_eq!(manager.retrieve("ctx-1").await.unwrap().unwrap(), "hi");
}

#[tokio::test]
async fn metadata_survives_the_round_trip() {
    let (_storage, manager) = manager();
    let metadata = HashMap::from([("file".to_string(), "src/main.rs".to_string())]);
    manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, Some(metadata.clone()))
        .await
        .unwrap();

    let record = manager.get("ctx-1").await.unwrap().unwrap();
    assert_eq!(record.metadata, metadata);
    assert_eq!(record.access_count, 1);
}

#[tokio::test]
async fn unknown_ids_are_none_not_errors() {
    let (_storage, manager) = manager();
    assert!(manager.get("ghost").await.unwrap().is_none());
    assert!(manager.retrieve("ghost").await.unwrap().is_none());
}

// ── Tiers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_writes_land_in_the_hot_tier() {
    let (_storage, manager) = manager();
    manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();

    let hot = manager.list_hot().await.unwrap();
    assert_eq!(hot.len(), 1);
    assert_eq!(hot[0].id, "ctx-1");
}

#[tokio::test]
async fn tier_listings_partition_by_recency() {
    let (storage, manager) = manager();
    storage.save(&backdated("warm-1", 3, 0)).unwrap();
    storage.save(&backdated("cold-1", 30, 0)).unwrap();
    manager
        .compress("hot-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();

    let warm: Vec<_> = manager
        .list_warm(100)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    let cold: Vec<_> = manager
        .list_cold(0, 100)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(warm, vec!["warm-1".to_string()]);
    assert_eq!(cold, vec!["cold-1".to_string()]);
}

#[tokio::test]
async fn migration_promotes_an_aged_heavily_accessed_record() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let config = EngramConfig {
        tiers: TierConfig {
            promotion_threshold: 10,
            ..TierConfig::default()
        },
        ..EngramConfig::default()
    };
    let manager = ContextManager::with_storage(Arc::clone(&storage), config.clone());

    storage.save(&backdated("veteran", 10, 15)).unwrap();

    let report = manager.migrate_tiers().await.unwrap();
    assert_eq!(report.promoted, 1);

    let hot = manager.list_hot().await.unwrap();
    assert_eq!(hot[0].id, "veteran");
    let refreshed = storage.get("veteran").unwrap().unwrap();
    assert_eq!(
        Tier::classify(refreshed.last_accessed, Utc::now(), &config.tiers),
        Tier::Hot
    );
}

// ── Analytics ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn usage_report_reflects_compress_calls() {
    let (_storage, manager) = manager();
    manager
        .compress(
            "ctx-1",
            "proj-a",
            SAMPLE,
            None,
            Some("sess-1".to_string()),
            None,
        )
        .await
        .unwrap();
    manager
        .compress(
            "ctx-2",
            "proj-a",
            SAMPLE,
            None,
            Some("sess-1".to_string()),
            None,
        )
        .await
        .unwrap();

    let report = manager.usage_report().await.unwrap();
    assert_eq!(report.session.operations, 2);
    assert_eq!(report.all_time.operations, 2);
}

#[tokio::test]
async fn stats_scope_to_project() {
    let (_storage, manager) = manager();
    manager
        .compress("a", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();
    manager
        .compress("b", "proj-b", SAMPLE, None, None, None)
        .await
        .unwrap();

    let scoped = manager.stats(Some("proj-a".to_string())).await.unwrap();
    assert_eq!(scoped.context_count, 1);
    let global = manager.stats(None).await.unwrap();
    assert_eq!(global.context_count, 2);
    assert_eq!(global.project_count, 2);
}

// ── Export / import ───────────────────────────────────────────────────────

#[tokio::test]
async fn export_import_reproduces_the_project() {
    let (_s1, source) = manager();
    for i in 0..4 {
        source
            .compress(format!("ctx-{i}"), "proj-a", SAMPLE, None, None, None)
            .await
            .unwrap();
    }
    let json = source.export_project("proj-a").await.unwrap();

    let (target_storage, target) = manager();
    let summary = target.import_project(json).await.unwrap();
    assert_eq!(summary.contexts_imported, 4);

    let imported: HashSet<_> = target_storage
        .list_by_project("proj-a", 100, 0)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    let expected: HashSet<_> = (0..4).map(|i| format!("ctx-{i}")).collect();
    assert_eq!(imported, expected);

    // The imported payloads still decompress.
    assert_eq!(target.retrieve("ctx-0").await.unwrap().unwrap(), SAMPLE);
}

#[tokio::test]
async fn malformed_import_document_is_rejected() {
    let (_storage, manager) = manager();
    assert!(manager.import_project("not json at all").await.is_err());
}

#[tokio::test]
async fn purge_after_export_leaves_no_trace() {
    let (storage, manager) = manager();
    manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();

    let _json = manager.export_project("proj-a").await.unwrap();
    let removed = manager.purge_project("proj-a").await.unwrap();
    assert_eq!(removed, 1);
    assert!(storage.get_project("proj-a").unwrap().is_none());
    assert!(manager.get("ctx-1").await.unwrap().is_none());
}

// ── Cleanup ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn cleanup_deletes_exactly_the_stale_record() {
    let (storage, manager) = manager();
    storage.save(&backdated("stale", 45, 0)).unwrap();
    storage.save(&backdated("recent", 5, 0)).unwrap();

    let deleted = manager.cleanup(30).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(storage.get("stale").unwrap().is_none());
    assert!(storage.get("recent").unwrap().is_some());
}

#[tokio::test]
async fn cleanup_evicts_deleted_records_from_the_hot_tier() {
    let (storage, manager) = manager();
    manager
        .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
        .await
        .unwrap();
    assert_eq!(manager.list_hot().await.unwrap().len(), 1);

    // A zero-day window deletes everything written so far; the hot tier
    // must stop serving the row too.
    let deleted = manager.cleanup(0).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(manager.list_hot().await.unwrap().is_empty());
    assert!(manager.get("ctx-1").await.unwrap().is_none());
    assert!(storage.get("ctx-1").unwrap().is_none());
}

// ── File-backed mode ──────────────────────────────────────────────────────

#[tokio::test]
async fn file_backed_manager_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngramConfig {
        storage: StorageConfig {
            db_path: Some(dir.path().join("contexts.db")),
            read_pool_size: 2,
        },
        ..EngramConfig::default()
    };

    {
        let manager = ContextManager::new(config.clone()).unwrap();
        manager
            .compress("ctx-1", "proj-a", SAMPLE, None, None, None)
            .await
            .unwrap();
    }

    let reopened = ContextManager::new(config).unwrap();
    assert_eq!(
        reopened.retrieve("ctx-1").await.unwrap().unwrap(),
        SAMPLE
    );
}

// ── Decisions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn decision_trail_round_trips_with_single_backfill() {
    let (_storage, manager) = manager();
    let decision = manager
        .record_decision(
            "sess-1",
            Some("task-9".to_string()),
            "cache the token counts",
            "repeated inputs dominate",
            "compression hot path",
        )
        .await
        .unwrap();

    assert!(manager
        .complete_decision(decision.id.clone(), "worked")
        .await
        .unwrap());
    assert!(!manager
        .complete_decision(decision.id.clone(), "rewritten")
        .await
        .unwrap());

    let trail = manager.session_decisions("sess-1").await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].outcome.as_deref(), Some("worked"));
    assert_eq!(trail[0].task_id.as_deref(), Some("task-9"));
}
