//! Read path across the three tiers plus the periodic migration sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use engram_core::config::TierConfig;
use engram_core::errors::EngramResult;
use engram_core::models::{ContextRecord, MigrationReport, Tier};
use engram_core::traits::IContextStorage;
use engram_storage::StorageEngine;

use crate::hot_cache::HotCache;

/// Tier-aware accessor over the storage engine. Owns the L0 hot cache;
/// the store remains the single source of truth and the cache is purely
/// read-through.
pub struct TierLoader {
    storage: Arc<StorageEngine>,
    cache: HotCache,
    config: TierConfig,
}

impl TierLoader {
    pub fn new(storage: Arc<StorageEngine>, config: &TierConfig) -> Self {
        let config = config.normalized();
        Self {
            cache: HotCache::new(config.l0_max_entries, config.l0_max_bytes),
            storage,
            config,
        }
    }

    /// Fetch one record, bumping its access bookkeeping. A hit anywhere
    /// refreshes the record in the store first, then admits the refreshed
    /// copy into L0 when it classifies hot.
    pub fn get(&self, id: &str) -> EngramResult<Option<ContextRecord>> {
        if self.cache.get(id).is_some() {
            return match self.storage.update_access(id)? {
                Some(refreshed) => {
                    self.cache.insert(refreshed.clone());
                    Ok(Some(refreshed))
                }
                // Deleted out from under the cache; drop the stale entry.
                None => {
                    self.cache.remove(id);
                    Ok(None)
                }
            };
        }

        if self.storage.get(id)?.is_none() {
            return Ok(None);
        }
        let Some(refreshed) = self.storage.update_access(id)? else {
            return Ok(None);
        };

        let tier = Tier::classify(refreshed.last_accessed, Utc::now(), &self.config);
        if tier == Tier::Hot && self.cache.insert(refreshed.clone()) {
            debug!(id, "admitted to hot cache");
        }
        Ok(Some(refreshed))
    }

    /// Place a freshly written record straight into L0.
    pub fn admit(&self, record: ContextRecord) -> bool {
        self.cache.insert(record)
    }

    /// Drop a record from L0 (after deletes or purges).
    pub fn forget(&self, id: &str) {
        self.cache.remove(id);
    }

    /// Drop every cache entry whose last access predates `cutoff`. Run
    /// after a bulk retention delete with the same cutoff so the cache
    /// cannot keep serving rows the store removed. Returns count evicted.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut evicted = 0;
        for record in self.cache.snapshot() {
            if record.last_accessed < cutoff && self.cache.remove(&record.id) {
                evicted += 1;
            }
        }
        evicted
    }

    /// The hot tier: the cache snapshot, most recently used first. Never
    /// touches the store.
    pub fn list_hot(&self) -> Vec<ContextRecord> {
        self.cache.snapshot()
    }

    /// The warm tier: records inside the warm window but outside the hot
    /// one, minus anything already served from L0.
    pub fn list_warm(&self, limit: usize) -> EngramResult<Vec<ContextRecord>> {
        let now = Utc::now();
        let hot_cutoff = now - self.config.hot_threshold();
        let warm_cutoff = now - self.config.warm_threshold();

        let cached = self.cache.cached_ids();
        // Over-fetch by the cache size so exclusion cannot shorten a page
        // while qualifying records remain.
        let fetch = limit.saturating_add(cached.len());
        let records = self
            .storage
            .list_accessed_between(warm_cutoff, hot_cutoff, fetch)?;
        let mut out: Vec<ContextRecord> = records
            .into_iter()
            .filter(|r| !cached.contains(&r.id))
            .collect();
        out.truncate(limit);
        Ok(out)
    }

    /// One page of the cold tier, oldest first. Stateless between calls;
    /// cached ids are excluded so a record never shows up in two tiers at
    /// once.
    pub fn lazy_cold(&self, offset: usize, limit: usize) -> EngramResult<Vec<ContextRecord>> {
        let warm_cutoff = Utc::now() - self.config.warm_threshold();
        let cached = self.cache.cached_ids();
        let fetch = limit.saturating_add(cached.len());
        let records = self.storage.list_cold_page(warm_cutoff, offset, fetch)?;
        let mut out: Vec<ContextRecord> = records
            .into_iter()
            .filter(|r| !cached.contains(&r.id))
            .collect();
        out.truncate(limit);
        Ok(out)
    }

    /// Migration sweep: demote cache entries whose age crossed the hot
    /// threshold, then promote records whose access count earned them a
    /// slot. Promotion counts as an access, so a promoted record classifies
    /// hot and the sweep converges instead of demoting it again next round.
    /// Never deletes from the store.
    pub fn migrate_tiers(&self) -> EngramResult<MigrationReport> {
        let now = Utc::now();
        let hot_cutoff = now - self.config.hot_threshold();

        let demoted = self.evict_older_than(hot_cutoff);

        // Candidates include records past the warm window: heavy access
        // history outranks staleness.
        let candidates = self.storage.promotion_candidates(
            self.config.promotion_threshold,
            hot_cutoff,
            self.config.l0_max_entries,
        )?;

        let mut promoted = 0;
        for record in candidates {
            if self.cache.contains(&record.id) {
                continue;
            }
            let Some(refreshed) = self.storage.update_access(&record.id)? else {
                continue;
            };
            if self.cache.insert(refreshed) {
                promoted += 1;
            }
        }

        debug!(promoted, demoted, "tier migration sweep complete");
        Ok(MigrationReport { promoted, demoted })
    }

    /// Number of records currently in L0.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }
}
