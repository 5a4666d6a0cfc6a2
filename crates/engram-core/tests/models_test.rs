use std::collections::HashMap;

use chrono::Utc;
use engram_core::errors::{EngramError, StorageError};
use engram_core::models::{
    CompressionAlgorithm, CompressionStrategy, ContextRecord, ProjectExport, ProjectRecord,
};

fn record(id: &str) -> ContextRecord {
    let now = Utc::now();
    ContextRecord {
        id: id.to_string(),
        project_key: "proj-a".to_string(),
        payload: vec![0xde, 0xad, 0xbe, 0xef],
        algorithm: CompressionAlgorithm::Zstd,
        strategy: CompressionStrategy::Balanced,
        original_tokens: 100,
        compressed_tokens: 25,
        metadata: HashMap::new(),
        created_at: now,
        last_accessed: now,
        access_count: 0,
    }
}

#[test]
fn strategy_and_algorithm_names_round_trip() {
    for strategy in [
        CompressionStrategy::Conservative,
        CompressionStrategy::Balanced,
        CompressionStrategy::Aggressive,
    ] {
        assert_eq!(strategy.as_str().parse::<CompressionStrategy>().unwrap(), strategy);
    }
    for algorithm in [
        CompressionAlgorithm::Zstd,
        CompressionAlgorithm::CondensedZstd,
        CompressionAlgorithm::Passthrough,
    ] {
        assert_eq!(
            algorithm.as_str().parse::<CompressionAlgorithm>().unwrap(),
            algorithm
        );
    }
}

#[test]
fn unknown_names_are_typed_errors() {
    assert!(matches!(
        "turbo".parse::<CompressionStrategy>(),
        Err(EngramError::InvalidStrategy { .. })
    ));
    assert!(matches!(
        "lz4".parse::<CompressionAlgorithm>(),
        Err(EngramError::InvalidAlgorithm { .. })
    ));
}

#[test]
fn binary_payload_survives_json() {
    let record = record("ctx-1");
    let json = serde_json::to_string(&record).unwrap();
    // Payload is carried as base64 text, not a byte array.
    assert!(json.contains("3q2+7w=="));
    let back: ContextRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn export_document_pins_its_schema_version() {
    let now = Utc::now();
    let project = ProjectRecord {
        key: "proj-a".to_string(),
        name: "proj-a".to_string(),
        path: None,
        context_count: 1,
        total_tokens: 100,
        first_seen: now,
        last_updated: now,
    };
    let export = ProjectExport::new(project, vec![record("ctx-1")]);
    assert_eq!(export.schema_version, engram_core::constants::EXPORT_SCHEMA_VERSION);
}

#[test]
fn storage_failures_are_distinguishable() {
    let degraded: EngramError = StorageError::Sqlite {
        message: "disk I/O error".to_string(),
    }
    .into();
    assert!(degraded.is_storage_failure());

    let not_found = EngramError::ContextNotFound {
        id: "ctx-1".to_string(),
    };
    assert!(!not_found.is_storage_failure());
    assert_eq!(not_found.to_string(), "context not found: ctx-1");
}
