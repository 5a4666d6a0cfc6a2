use std::sync::Arc;

use engram_compression::{condense, CompressionEngine};
use engram_core::config::CompressionConfig;
use engram_core::models::{CompressionAlgorithm, CompressionStrategy};
use engram_core::traits::ICompressor;
use engram_tokens::TokenCounter;

fn engine() -> CompressionEngine {
    CompressionEngine::new(Arc::new(TokenCounter::new()), &CompressionConfig::default())
}

fn long_text() -> String {
    let mut text = String::new();
    for i in 0..400 {
        text.push_str(&format!(
            "user: please refactor module {} to use the storage trait\n",
            i % 40
        ));
        text.push_str("assistant: done, the module now goes through IContextStorage\n\n");
    }
    text
}

// ── Round trips ───────────────────────────────────────────────────────────

#[test]
fn conservative_round_trip_is_byte_exact() {
    let engine = engine();
    let text = long_text();
    let artifact = engine
        .compress(&text, CompressionStrategy::Conservative)
        .unwrap();
    assert_eq!(artifact.algorithm, CompressionAlgorithm::Zstd);
    let back = engine
        .decompress(&artifact.payload, artifact.algorithm)
        .unwrap();
    assert_eq!(back, text);
}

#[test]
fn balanced_round_trip_is_byte_exact() {
    let engine = engine();
    let text = long_text();
    let artifact = engine.compress(&text, CompressionStrategy::Balanced).unwrap();
    let back = engine
        .decompress(&artifact.payload, artifact.algorithm)
        .unwrap();
    assert_eq!(back, text);
}

#[test]
fn aggressive_round_trip_returns_condensed_text() {
    let engine = engine();
    let text = long_text();
    let artifact = engine
        .compress(&text, CompressionStrategy::Aggressive)
        .unwrap();
    assert_eq!(artifact.algorithm, CompressionAlgorithm::CondensedZstd);
    let back = engine
        .decompress(&artifact.payload, artifact.algorithm)
        .unwrap();
    assert_eq!(back, condense(&text));
}

// ── Ratio accounting ──────────────────────────────────────────────────────

#[test]
fn repetitive_text_compresses_materially() {
    let engine = engine();
    let artifact = engine
        .compress(&long_text(), CompressionStrategy::Balanced)
        .unwrap();
    assert!(artifact.original_tokens > 1000);
    assert!(
        artifact.compressed_tokens < artifact.original_tokens / 2,
        "expected >2x savings, got {} -> {}",
        artifact.original_tokens,
        artifact.compressed_tokens
    );
    assert!(artifact.ratio() > 0.5);
}

#[test]
fn aggressive_beats_conservative_on_repetitive_text() {
    let engine = engine();
    let text = long_text();
    let conservative = engine
        .compress(&text, CompressionStrategy::Conservative)
        .unwrap();
    let aggressive = engine
        .compress(&text, CompressionStrategy::Aggressive)
        .unwrap();
    assert!(aggressive.payload.len() <= conservative.payload.len());
}

#[test]
fn slack_bound_holds_for_every_strategy() {
    let engine = engine();
    let text = long_text();
    for strategy in [
        CompressionStrategy::Conservative,
        CompressionStrategy::Balanced,
        CompressionStrategy::Aggressive,
    ] {
        let artifact = engine.compress(&text, strategy).unwrap();
        assert!(
            artifact.compressed_tokens as f64 <= artifact.original_tokens as f64 * 1.05,
            "{strategy}: {} > {} * 1.05",
            artifact.compressed_tokens,
            artifact.original_tokens
        );
    }
}

// ── Fallback ──────────────────────────────────────────────────────────────

#[test]
fn tiny_input_falls_back_to_passthrough() {
    let engine = engine();
    // zstd framing overhead dwarfs a few bytes of input.
    let artifact = engine.compress("hi", CompressionStrategy::Balanced).unwrap();
    assert_eq!(artifact.algorithm, CompressionAlgorithm::Passthrough);
    assert_eq!(artifact.ratio(), 0.0);
    let back = engine
        .decompress(&artifact.payload, artifact.algorithm)
        .unwrap();
    assert_eq!(back, "hi");
}

#[test]
fn empty_input_is_passthrough_with_zero_tokens() {
    let engine = engine();
    let artifact = engine.compress("", CompressionStrategy::Aggressive).unwrap();
    assert_eq!(artifact.algorithm, CompressionAlgorithm::Passthrough);
    assert_eq!(artifact.original_tokens, 0);
    assert_eq!(artifact.compressed_tokens, 0);
    assert_eq!(artifact.ratio(), 0.0);
}

#[test]
fn decompress_rejects_garbage_zstd_payload() {
    let engine = engine();
    let err = engine
        .decompress(b"not a zstd frame", CompressionAlgorithm::Zstd)
        .unwrap_err();
    assert!(err.to_string().contains("zstd"));
}

// ── Properties ────────────────────────────────────────────────────────────

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Few cases: each one pays for a tokenizer construction.
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn balanced_round_trips_any_text(text in "\\PC{0,400}") {
            let engine = engine();
            let artifact = engine.compress(&text, CompressionStrategy::Balanced).unwrap();
            let back = engine.decompress(&artifact.payload, artifact.algorithm).unwrap();
            prop_assert_eq!(back, text);
        }

        #[test]
        fn slack_bound_or_passthrough_for_any_text(text in "\\PC{0,400}") {
            let engine = engine();
            let artifact = engine.compress(&text, CompressionStrategy::Balanced).unwrap();
            if artifact.algorithm == CompressionAlgorithm::Passthrough {
                prop_assert_eq!(artifact.payload.as_slice(), text.as_bytes());
            } else {
                prop_assert!(
                    artifact.compressed_tokens as f64
                        <= artifact.original_tokens as f64 * 1.05
                );
            }
        }

        #[test]
        fn condense_is_idempotent(text in "\\PC{0,400}") {
            let once = condense(&text);
            prop_assert_eq!(condense(&once), once.clone());
        }
    }
}
