use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

/// Counts cached per content hash. Conversational contexts are re-counted
/// on every compress call; the cache makes repeat counts O(hash).
const CACHE_CAPACITY: u64 = 4096;

/// cl100k-based token counter with a blake3-keyed cache.
pub struct TokenCounter {
    bpe: CoreBPE,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Build a counter over the cl100k vocabulary.
    pub fn new() -> Self {
        // The vocabulary is embedded in the binary; construction only
        // fails if that data is corrupt, which is unrecoverable anyway.
        let bpe = tiktoken_rs::cl100k_base().expect("embedded cl100k vocabulary");
        Self {
            bpe,
            cache: Cache::new(CACHE_CAPACITY),
        }
    }

    /// Count tokens, bypassing the cache.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Count tokens through the content-hash cache.
    pub fn count_cached(&self, text: &str) -> usize {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(count) = self.cache.get(&key) {
            return count;
        }
        let count = self.count(text);
        self.cache.insert(key, count);
        count
    }

    /// Number of counts currently cached.
    pub fn cached_entries(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}
