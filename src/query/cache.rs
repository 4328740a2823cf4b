use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::core::config::QueryPlanCacheConfig;
use crate::core::types::SymbolicFilters;
use crate::query::planner::QueryPlan;

/// `(normalizedQuery, canonicalFilters, topK)` cache key (spec §4.9).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanCacheKey {
    normalized_query: String,
    canonical_filters: String,
    top_k: usize,
}

impl PlanCacheKey {
    pub fn new(raw_query: &str, filters: &SymbolicFilters, top_k: usize) -> Self {
        PlanCacheKey {
            normalized_query: raw_query.trim().to_lowercase(),
            canonical_filters: canonicalize_filters(filters),
            top_k,
        }
    }
}

/// Deterministic string form of a filter set so equivalent filters (same
/// tags in a different order, for instance) hash identically.
fn canonicalize_filters(filters: &SymbolicFilters) -> String {
    let mut tags = filters.tags.clone().unwrap_or_default();
    tags.sort();
    let mut types = filters.entity_types.clone().unwrap_or_default();
    types.sort();

    format!(
        "tags={:?};types={:?};dates={:?}-{:?};importance={:?}-{:?};parent={:?};has_obs={:?}",
        tags,
        types,
        filters.date_range.as_ref().and_then(|d| d.start).map(|t| t.to_rfc3339()),
        filters.date_range.as_ref().and_then(|d| d.end).map(|t| t.to_rfc3339()),
        filters.importance.as_ref().and_then(|i| i.min),
        filters.importance.as_ref().and_then(|i| i.max),
        filters.parent_id,
        filters.has_observations,
    )
}

struct CachedPlan {
    plan: QueryPlan,
    created_at: Instant,
}

/// LRU-bounded query plan cache with optional TTL, grounded on the
/// lexical search layer's own query-result cache pattern.
pub struct PlanCache {
    cache: LruCache<PlanCacheKey, CachedPlan>,
    ttl: Option<Duration>,
    hit_count: u64,
    miss_count: u64,
    capacity: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hit_count: u64,
    pub miss_count: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

impl PlanCache {
    pub fn new(config: &QueryPlanCacheConfig) -> Self {
        let capacity = config.max_size.max(1);
        PlanCache {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap()),
            ttl: config.ttl_ms.map(Duration::from_millis),
            hit_count: 0,
            miss_count: 0,
            capacity,
        }
    }

    pub fn get(&mut self, key: &PlanCacheKey) -> Option<QueryPlan> {
        let expired = match self.cache.peek(key) {
            None => {
                self.miss_count += 1;
                return None;
            }
            Some(entry) => self.ttl.is_some_and(|ttl| entry.created_at.elapsed() > ttl),
        };

        if expired {
            self.cache.pop(key);
            self.miss_count += 1;
            return None;
        }

        self.hit_count += 1;
        self.cache.get(key).map(|entry| entry.plan.clone())
    }

    pub fn put(&mut self, key: PlanCacheKey, plan: QueryPlan) {
        self.cache.put(key, CachedPlan { plan, created_at: Instant::now() });
    }

    /// Invalidated wholesale by the incremental indexer when the changed
    /// fraction crosses the configured threshold (spec §4.9/§4.14).
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            size: self.cache.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::planner::Layer;

    #[test]
    fn equivalent_filters_hash_identically_regardless_of_tag_order() {
        let mut a = SymbolicFilters::default();
        a.tags = Some(vec!["b".to_string(), "a".to_string()]);
        let mut b = SymbolicFilters::default();
        b.tags = Some(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(PlanCacheKey::new("q", &a, 10), PlanCacheKey::new("q", &b, 10));
    }

    #[test]
    fn hit_and_miss_counted() {
        let mut cache = PlanCache::new(&QueryPlanCacheConfig { max_size: 10, ttl_ms: None });
        let key = PlanCacheKey::new("rust", &SymbolicFilters::default(), 10);
        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), QueryPlan { layers: vec![Layer::Lexical], top_k: 10 });
        assert!(cache.get(&key).is_some());

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }
}
