//! Caller-owned LRU cache of block indexes.
//!
//! Indexing a large document is the most expensive step of every view, and
//! views are recomputed on each page switch or query change. The cache keeps
//! one [`BlockIndex`] per [`SnapshotKey`]; a refetched document has a new key,
//! misses, and replaces the stale snapshots of the same document.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{BlockIndex, SnapshotKey};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::Document;

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that built a new index
    pub misses: u64,
}

/// LRU cache from snapshot key to index.
///
/// Entries are kept in recency order: the front of the map is the least
/// recently used.
#[derive(Debug)]
pub struct IndexCache {
    config: EngineConfig,
    entries: IndexMap<SnapshotKey, Arc<BlockIndex>>,
    stats: CacheStats,
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexCache {
    /// Create a cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a cache with a configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            entries: IndexMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Configuration shared with graphs built through this cache.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Maximum number of cached snapshots.
    pub fn capacity(&self) -> usize {
        self.config.index_cache_capacity.max(1)
    }

    /// Return the index for `document`, building it on a miss.
    pub fn get_or_build(&mut self, document: &Document) -> Result<Arc<BlockIndex>> {
        let key = SnapshotKey::of(document);

        if let Some(index) = self.entries.shift_remove(&key) {
            self.entries.insert(key, Arc::clone(&index));
            self.stats.hits += 1;
            log::trace!("Index cache hit for '{}' @ '{}'", document.id, document.fetched_at);
            return Ok(index);
        }

        self.stats.misses += 1;
        let index = Arc::new(BlockIndex::build(document)?);

        let before = self.entries.len();
        self.entries
            .retain(|k, _| k.document_id != key.document_id);
        if self.entries.len() < before {
            log::debug!(
                "Dropped {} stale snapshot(s) of document '{}'",
                before - self.entries.len(),
                key.document_id
            );
        }

        self.entries.insert(key, Arc::clone(&index));
        while self.entries.len() > self.capacity() {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                log::debug!("Evicted index for '{}' @ '{}'", evicted.document_id, evicted.fetched_at);
            }
        }

        Ok(index)
    }

    /// Whether an index for this exact snapshot is cached.
    pub fn contains(&self, key: &SnapshotKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every cached snapshot of `document_id`, returning how many were removed.
    pub fn invalidate(&mut self, document_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.document_id != document_id);
        before - self.entries.len()
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
