use std::path::PathBuf;

/// Scalar-quantization option for the dense vector store (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorQuantization {
    None,
    Int8,
}

#[derive(Debug, Clone)]
pub struct Bm25Config {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Bm25Config { k1: 1.2, b: 0.75 }
    }
}

#[derive(Debug, Clone)]
pub struct VectorConfig {
    pub quantize: VectorQuantization,
    /// Mirror every vector mutation to the `GraphStore` and reload the
    /// full set at construction (spec §4.5). Ignores `quantize`: the
    /// persistent store always wraps an unquantized `InMemoryVectorStore`.
    pub persist: bool,
}

impl Default for VectorConfig {
    fn default() -> Self {
        VectorConfig { quantize: VectorQuantization::None, persist: false }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingCacheConfig {
    pub max_size: usize,
    pub ttl_ms: u64,
    pub dimensions: usize,
}

impl Default for EmbeddingCacheConfig {
    fn default() -> Self {
        EmbeddingCacheConfig {
            max_size: 1000,
            ttl_ms: 3_600_000,
            dimensions: 384,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryPlanCacheConfig {
    pub max_size: usize,
    pub ttl_ms: Option<u64>,
}

impl Default for QueryPlanCacheConfig {
    fn default() -> Self {
        QueryPlanCacheConfig { max_size: 256, ttl_ms: None }
    }
}

#[derive(Debug, Clone)]
pub struct FuzzyConfig {
    pub threshold: f32,
    pub worker_threshold: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        FuzzyConfig { threshold: 0.6, worker_threshold: 500 }
    }
}

#[derive(Debug, Clone)]
pub struct HybridWeights {
    pub semantic: f32,
    pub lexical: f32,
    pub symbolic: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        HybridWeights { semantic: 0.4, lexical: 0.4, symbolic: 0.2 }
    }
}

#[derive(Debug, Clone)]
pub struct HybridConfig {
    pub weights: HybridWeights,
    pub min_score: f32,
    pub normalize_weights: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        HybridConfig {
            weights: HybridWeights::default(),
            min_score: 0.0,
            normalize_weights: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub per_layer_timeout_ms: u64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig { per_layer_timeout_ms: 2000 }
    }
}

#[derive(Debug, Clone)]
pub struct EarlyTerminationConfig {
    pub adequacy_threshold: f32,
    pub min_results: usize,
}

impl Default for EarlyTerminationConfig {
    fn default() -> Self {
        EarlyTerminationConfig { adequacy_threshold: 0.8, min_results: 5 }
    }
}

#[derive(Debug, Clone)]
pub struct ReflectionConfig {
    pub min_satisfactory_score: f32,
    pub min_desired_results: usize,
    pub max_iterations: usize,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        ReflectionConfig {
            min_satisfactory_score: 0.5,
            min_desired_results: 3,
            max_iterations: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub batch_size: usize,
    pub plan_cache_invalidate_fraction: f32,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig { batch_size: 256, plan_cache_invalidate_fraction: 0.005 }
    }
}

#[derive(Debug, Clone)]
pub struct MutexConfig {
    pub max_queue_length: usize,
    pub timeout_ms: u64,
}

impl Default for MutexConfig {
    fn default() -> Self {
        MutexConfig { max_queue_length: 1000, timeout_ms: 30_000 }
    }
}

#[derive(Debug, Clone)]
pub struct Limits {
    pub max_entities: usize,
    pub max_relations: usize,
    pub max_observations_per_entity: usize,
    pub max_tags_per_entity: usize,
    pub max_query_depth: usize,
    pub max_query_terms: usize,
    pub max_query_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_entities: 100_000,
            max_relations: 1_000_000,
            max_observations_per_entity: 1000,
            max_tags_per_entity: 100,
            max_query_depth: 10,
            max_query_terms: 50,
            max_query_length: 5000,
        }
    }
}

/// Top-level configuration, mirroring every knob enumerated in spec §6.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: PathBuf,
    pub bm25: Bm25Config,
    pub vector: VectorConfig,
    pub embedding_cache: EmbeddingCacheConfig,
    pub query_plan_cache: QueryPlanCacheConfig,
    pub fuzzy: FuzzyConfig,
    pub hybrid: HybridConfig,
    pub parallel: ParallelConfig,
    pub early_termination: EarlyTerminationConfig,
    pub reflection: ReflectionConfig,
    pub indexer: IndexerConfig,
    pub mutex: MutexConfig,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./data"),
            bm25: Bm25Config::default(),
            vector: VectorConfig::default(),
            embedding_cache: EmbeddingCacheConfig::default(),
            query_plan_cache: QueryPlanCacheConfig::default(),
            fuzzy: FuzzyConfig::default(),
            hybrid: HybridConfig::default(),
            parallel: ParallelConfig::default(),
            early_termination: EarlyTerminationConfig::default(),
            reflection: ReflectionConfig::default(),
            indexer: IndexerConfig::default(),
            mutex: MutexConfig::default(),
            limits: Limits::default(),
        }
    }
}
