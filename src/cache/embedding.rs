use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::core::config::EmbeddingCacheConfig;

struct CachedEmbedding {
    vector: Vec<f32>,
    text_hash: u64,
    created_at: Instant,
}

/// LRU embedding cache with TTL and content-hash invalidation (spec §4.6).
/// Eviction on overflow is delegated to the underlying `LruCache`, which
/// always evicts the entry with the oldest `lastAccess` — exactly the
/// policy the spec describes.
pub struct EmbeddingCache {
    entries: LruCache<String, CachedEmbedding>,
    ttl: Duration,
    dimensions: usize,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f32,
    pub memory_bytes: u64,
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl EmbeddingCache {
    pub fn new(config: &EmbeddingCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_size.max(1)).unwrap();
        EmbeddingCache {
            entries: LruCache::new(capacity),
            ttl: Duration::from_millis(config.ttl_ms),
            dimensions: config.dimensions,
            hits: 0,
            misses: 0,
        }
    }

    /// Miss if absent, expired, or the content hash no longer matches
    /// `current_text`. Any such miss evicts the stale entry.
    pub fn get(&mut self, key: &str, current_text: &str) -> Option<Vec<f32>> {
        let is_stale = match self.entries.peek(key) {
            None => {
                self.misses += 1;
                return None;
            }
            Some(entry) => {
                entry.created_at.elapsed() > self.ttl || entry.text_hash != hash_text(current_text)
            }
        };

        if is_stale {
            self.entries.pop(key);
            self.misses += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key).map(|entry| entry.vector.clone())
    }

    pub fn set(&mut self, key: &str, text: &str, vector: Vec<f32>) {
        self.entries.put(
            key.to_string(),
            CachedEmbedding { vector, text_hash: hash_text(text), created_at: Instant::now() },
        );
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.pop(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total == 0 { 0.0 } else { self.hits as f32 / total as f32 };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            memory_bytes: self.entries.len() as u64 * (self.dimensions as u64 * 8 + 98),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_size: usize, ttl_ms: u64) -> EmbeddingCacheConfig {
        EmbeddingCacheConfig { max_size, ttl_ms, dimensions: 4 }
    }

    #[test]
    fn hit_then_miss_on_text_change() {
        let mut cache = EmbeddingCache::new(&config(10, 60_000));
        cache.set("alice", "software engineer", vec![1.0, 2.0, 3.0, 4.0]);
        assert!(cache.get("alice", "software engineer").is_some());
        assert!(cache.get("alice", "changed text").is_none());
        assert!(cache.get("alice", "changed text").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let mut cache = EmbeddingCache::new(&config(10, 0));
        cache.set("alice", "text", vec![1.0; 4]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("alice", "text").is_none());
    }

    #[test]
    fn overflow_evicts_least_recently_used() {
        let mut cache = EmbeddingCache::new(&config(2, 60_000));
        cache.set("a", "a", vec![0.0; 4]);
        cache.set("b", "b", vec![0.0; 4]);
        cache.get("a", "a");
        cache.set("c", "c", vec![0.0; 4]);
        assert!(cache.get("b", "b").is_none());
        assert!(!cache.is_empty());
    }

    #[test]
    fn memory_estimate_matches_formula() {
        let mut cache = EmbeddingCache::new(&config(10, 60_000));
        cache.set("a", "a", vec![0.0; 4]);
        assert_eq!(cache.stats().memory_bytes, 4 * 8 + 98);
    }
}
