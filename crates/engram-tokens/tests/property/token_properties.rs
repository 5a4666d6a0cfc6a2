use engram_tokens::TokenCounter;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn count_is_bounded_by_input_length(s in ".{0,200}") {
        let counter = TokenCounter::new();
        let count = counter.count(&s);
        // A token is at least one byte, so counts can never exceed bytes.
        prop_assert!(count <= s.len().max(1) * 4);
    }

    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::new();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::new();
        let combined = format!("{a}{b}");
        prop_assert!(
            counter.count(&combined) <= counter.count(&a) + counter.count(&b) + 1
        );
    }
}
