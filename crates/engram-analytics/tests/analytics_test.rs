use std::sync::Arc;

use chrono::{Duration, Utc};
use engram_analytics::{Analytics, MetricsRecorder};
use engram_core::config::AnalyticsConfig;
use engram_core::models::{CompressOutcome, CompressionAlgorithm, CompressionMetric, CompressionStrategy};
use engram_core::traits::IMetricsStorage;
use engram_storage::StorageEngine;

fn outcome(id: &str, original: usize, compressed: usize) -> CompressOutcome {
    CompressOutcome {
        id: id.to_string(),
        project_key: "proj-a".to_string(),
        algorithm: CompressionAlgorithm::Zstd,
        strategy: CompressionStrategy::Balanced,
        original_tokens: original,
        compressed_tokens: compressed,
        ratio: 1.0 - compressed as f64 / original as f64,
        elapsed_ms: 1.5,
    }
}

fn backdated_metric(id: &str, days_ago: i64, original: usize, compressed: usize) -> CompressionMetric {
    CompressionMetric {
        context_id: id.to_string(),
        session_id: "old-session".to_string(),
        original_tokens: original,
        compressed_tokens: compressed,
        ratio: 1.0 - compressed as f64 / original as f64,
        elapsed_ms: 1.0,
        algorithm: CompressionAlgorithm::Zstd,
        strategy: CompressionStrategy::Balanced,
        timestamp: Utc::now() - Duration::days(days_ago),
    }
}

#[test]
fn empty_store_yields_zeroed_report() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let analytics = Analytics::new(storage, &AnalyticsConfig::default());

    let report = analytics.usage_report().unwrap();
    assert_eq!(report.all_time.operations, 0);
    assert_eq!(report.all_time.tokens_saved, 0);
    assert_eq!(report.all_time.average_ratio, 0.0);
    assert_eq!(report.all_time.cost_saved_usd, 0.0);
}

#[test]
fn recorder_feeds_the_session_window() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let recorder = MetricsRecorder::new(Arc::clone(&storage));
    let analytics = Analytics::new(Arc::clone(&storage), &AnalyticsConfig::default());

    recorder.record(&outcome("c1", 1000, 400), "sess-1");
    recorder.record(&outcome("c2", 2000, 500), "sess-1");

    let report = analytics.usage_report().unwrap();
    assert_eq!(report.session.operations, 2);
    assert_eq!(report.session.tokens_saved, 2100);
    // 2100 tokens saved at $0.003 per 1k.
    assert!((report.session.cost_saved_usd - 0.0063).abs() < 1e-9);
    assert_eq!(report.session, report.all_time);
}

#[test]
fn windows_partition_by_metric_age() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    storage.record_metric(&backdated_metric("recent", 1, 100, 50)).unwrap();
    storage.record_metric(&backdated_metric("last-month", 20, 100, 50)).unwrap();
    storage.record_metric(&backdated_metric("ancient", 100, 100, 50)).unwrap();

    let analytics = Analytics::new(Arc::clone(&storage), &AnalyticsConfig::default());
    let report = analytics.usage_report().unwrap();
    assert_eq!(report.session.operations, 0);
    assert_eq!(report.weekly.operations, 1);
    assert_eq!(report.monthly.operations, 2);
    assert_eq!(report.all_time.operations, 3);
}

#[test]
fn retention_cutoff_matches_configured_days() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    storage.record_metric(&backdated_metric("ancient", 100, 100, 50)).unwrap();
    storage.record_metric(&backdated_metric("recent", 1, 100, 50)).unwrap();

    let analytics = Analytics::new(Arc::clone(&storage), &AnalyticsConfig::default());
    let removed = storage
        .delete_metrics_older_than(analytics.retention_cutoff())
        .unwrap();
    assert_eq!(removed, 1);

    let report = analytics.usage_report().unwrap();
    assert_eq!(report.all_time.operations, 1);
}

#[test]
fn cost_scales_with_configured_price() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    storage.record_metric(&backdated_metric("c1", 0, 2000, 1000)).unwrap();

    let config = AnalyticsConfig {
        cost_per_1k_tokens: 0.01,
        ..AnalyticsConfig::default()
    };
    let analytics = Analytics::new(storage, &config);
    let summary = analytics.summary_since(None).unwrap();
    assert!((summary.cost_saved_usd - 0.01).abs() < 1e-9);
}
