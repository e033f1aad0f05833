//! Bounded LRU cache of text embeddings keyed by content hash.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Default number of cached embeddings
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// hits / (hits + misses), 0 before the first lookup
    pub hit_rate: f64,
}

struct CacheState {
    entries: LruCache<String, Vec<f32>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Embedding cache shared by every scorer of one engine.
///
/// All state sits behind a single mutex, so each call observes and updates
/// recency order and counters atomically.
pub struct EmbeddingCache {
    state: Mutex<CacheState>,
    capacity: NonZeroUsize,
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl EmbeddingCache {
    /// Create a cache holding at most `capacity` embeddings (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity,
        }
    }

    /// Look up the embedding of `text`, promoting it to most recently used.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let key = cache_key(text);
        let mut state = self.state.lock();
        match state.entries.get(&key).cloned() {
            Some(embedding) => {
                state.hits += 1;
                Some(embedding)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store the embedding of `text`, evicting the least recently used entry
    /// when full.
    pub fn set(&self, text: &str, embedding: Vec<f32>) {
        let key = cache_key(text);
        let mut state = self.state.lock();
        if let Some((old_key, _)) = state.entries.push(key.clone(), embedding) {
            if old_key != key {
                state.evictions += 1;
                debug!(evicted = %old_key, "embedding cache evicted LRU entry");
            }
        }
    }

    /// Whether `text` is cached. Does not touch recency or counters.
    pub fn contains(&self, text: &str) -> bool {
        let key = cache_key(text);
        self.state.lock().entries.contains(&key)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
        state.evictions = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let lookups = state.hits + state.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            state.hits as f64 / lookups as f64
        };

        CacheStats {
            size: state.entries.len(),
            max_size: self.capacity.get(),
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            hit_rate,
        }
    }
}

/// SHA-256 hex digest of the text, used as the cache key.
pub fn cache_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
