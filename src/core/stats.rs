use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::cache::embedding::CacheStats as EmbeddingCacheStats;
use crate::query::cache::CacheStats as PlanCacheStats;

/// Engine-wide statistics for monitoring (ambient observability, not a
/// retrieval feature in its own right).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub uptime_secs: u64,
    pub total_entities: usize,
    pub total_relations: usize,
    pub inverted_index_terms: usize,
    pub vector_count: usize,
    pub embedding_cache: EmbeddingCacheStats,
    pub plan_cache: PlanCacheStats,
    pub indexer_state: IndexerHealth,
    pub queries_served: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum IndexerHealth {
    Healthy,
    Degraded { consecutive_flush_failures: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    #[serde(skip, default = "SystemTime::now")]
    pub timestamp: SystemTime,
}
