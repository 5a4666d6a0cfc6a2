//! Bounded strict-LRU cache for hot-tier context records.
//!
//! Strict means exact: on overflow the single least-recently-used entry is
//! evicted, every time. Recency is a monotonic stamp bumped on both reads
//! and writes, so `get` is a touch.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use engram_core::models::ContextRecord;

struct CacheEntry {
    record: ContextRecord,
    stamp: u64,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    bytes: usize,
    clock: u64,
}

impl CacheInner {
    fn touch(&mut self, id: &str) -> Option<ContextRecord> {
        self.clock += 1;
        let clock = self.clock;
        let entry = self.entries.get_mut(id)?;
        entry.stamp = clock;
        Some(entry.record.clone())
    }

    /// Remove the entry with the oldest stamp. Returns freed payload bytes.
    fn evict_lru(&mut self) -> Option<usize> {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.stamp)
            .map(|(id, _)| id.clone())?;
        let entry = self.entries.remove(&victim)?;
        let freed = entry.record.payload.len();
        self.bytes -= freed;
        Some(freed)
    }
}

/// The L0 cache. All methods take `&self`; the inner state sits behind a
/// `Mutex` so the loader can share the cache across call sites.
pub struct HotCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
    max_bytes: usize,
}

impl HotCache {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                bytes: 0,
                clock: 0,
            }),
            max_entries,
            max_bytes,
        }
    }

    /// Look up a record and mark it most-recently-used.
    pub fn get(&self, id: &str) -> Option<ContextRecord> {
        self.lock().touch(id)
    }

    /// Insert (or replace) a record, evicting strict-LRU victims until both
    /// bounds hold. A record too large for the byte bound on its own is
    /// refused rather than flushing the whole cache. Returns whether the
    /// record is cached afterwards.
    pub fn insert(&self, record: ContextRecord) -> bool {
        let size = record.payload.len();
        if size > self.max_bytes || self.max_entries == 0 {
            return false;
        }

        let mut inner = self.lock();
        if let Some(existing) = inner.entries.remove(&record.id) {
            inner.bytes -= existing.record.payload.len();
        }
        while inner.entries.len() >= self.max_entries
            || inner.bytes + size > self.max_bytes
        {
            if inner.evict_lru().is_none() {
                break;
            }
        }

        inner.clock += 1;
        let stamp = inner.clock;
        inner.bytes += size;
        inner.entries.insert(record.id.clone(), CacheEntry { record, stamp });
        true
    }

    /// Drop one entry by id. Returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let mut inner = self.lock();
        match inner.entries.remove(id) {
            Some(entry) => {
                inner.bytes -= entry.record.payload.len();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().entries.contains_key(id)
    }

    /// Cached records, most recently used first. Does not touch recency.
    pub fn snapshot(&self) -> Vec<ContextRecord> {
        let inner = self.lock();
        let mut entries: Vec<_> = inner
            .entries
            .values()
            .map(|entry| (entry.stamp, entry.record.clone()))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|(_, record)| record).collect()
    }

    /// Ids currently cached, for exclusion in warm/cold queries.
    pub fn cached_ids(&self) -> HashSet<String> {
        self.lock().entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes currently held.
    pub fn bytes(&self) -> usize {
        self.lock().bytes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        // A poisoned cache mutex means a panic mid-update; the map itself
        // is still structurally sound, so keep serving.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
