use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tracing::{info, warn};

use crate::core::config::IndexerConfig;
use crate::core::stats::IndexerHealth;
use crate::core::types::KnowledgeGraph;
use crate::index::lexical::LexicalIndex;
use crate::query::cache::PlanCache;
use crate::vector::store::VectorStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOpKind {
    Add,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub struct IndexOp {
    pub kind: IndexOpKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerState {
    Idle,
    Buffering,
    Flushing,
}

#[derive(Debug, Clone, Default)]
pub struct FlushResult {
    pub applied: usize,
    pub failed: usize,
    pub latency_ms: u64,
    pub plan_cache_invalidated: bool,
}

/// FIFO-queued incremental indexer driving the lexical index and
/// (optionally) the vector store from graph change events (spec §4.14).
/// State machine: `idle -> buffering -> flushing -> idle`; a second flush
/// request arriving during `flushing` is coalesced (spec §4.16).
pub struct IncrementalIndexer {
    config: IndexerConfig,
    queue: VecDeque<IndexOp>,
    state: IndexerState,
    flushing: bool,
    coalesced_flush_requested: bool,
    consecutive_flush_failures: u32,
    total_indexed_docs: usize,
}

impl IncrementalIndexer {
    pub fn new(config: IndexerConfig) -> Self {
        IncrementalIndexer {
            config,
            queue: VecDeque::new(),
            state: IndexerState::Idle,
            flushing: false,
            coalesced_flush_requested: false,
            consecutive_flush_failures: 0,
            total_indexed_docs: 0,
        }
    }

    pub fn state(&self) -> IndexerState {
        self.state
    }

    pub fn health(&self) -> IndexerHealth {
        if self.consecutive_flush_failures >= 3 {
            IndexerHealth::Degraded { consecutive_flush_failures: self.consecutive_flush_failures }
        } else {
            IndexerHealth::Healthy
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Enqueues an operation. If already flushing, the request to flush
    /// again is remembered and coalesced rather than queued twice.
    pub fn enqueue(&mut self, op: IndexOp) {
        if self.flushing {
            self.coalesced_flush_requested = true;
        }
        self.queue.push_back(op);
        self.state = IndexerState::Buffering;
    }

    pub fn should_flush(&self) -> bool {
        !self.flushing && self.queue.len() >= self.config.batch_size
    }

    /// Read-only peek at the currently queued ops, used by callers that
    /// need to compute something (e.g. embeddings) before `flush` drains
    /// the same queue.
    pub fn queued_ops(&self) -> impl Iterator<Item = &IndexOp> {
        self.queue.iter()
    }

    /// Applies every queued operation to `lexical` (and `vector_store`,
    /// when embeddings are enabled) and reports a `FlushResult`.
    /// Invalidates `plan_cache` when the changed fraction crosses the
    /// configured threshold. `embeddings` carries a precomputed vector per
    /// `Add`/`Update` op name (the embedder call itself is async and
    /// lives in the caller, since this indexer's state machine is
    /// synchronous); an op without an entry is left unindexed for the
    /// vector store this round.
    pub fn flush(
        &mut self,
        graph: &KnowledgeGraph,
        lexical: &mut LexicalIndex,
        vector_store: Option<&mut dyn VectorStore>,
        embeddings: &HashMap<String, Vec<f32>>,
        plan_cache: &mut PlanCache,
    ) -> FlushResult {
        self.flushing = true;
        self.state = IndexerState::Flushing;
        let start = Instant::now();

        let ops: Vec<IndexOp> = self.queue.drain(..).collect();
        let changed: Vec<String> = ops.iter().map(|op| op.name.clone()).collect();
        let mut applied = 0usize;
        let mut failed = 0usize;

        lexical.update_index(graph, &changed);
        applied += changed.len();

        if let Some(store) = vector_store {
            for op in &ops {
                let result = match op.kind {
                    IndexOpKind::Delete => store.remove(&op.name),
                    IndexOpKind::Add | IndexOpKind::Update => match embeddings.get(&op.name) {
                        Some(vector) => store.add(&op.name, vector.clone()),
                        None => Ok(()),
                    },
                };
                if result.is_err() {
                    failed += 1;
                }
            }
        }

        if applied == 0 {
            self.consecutive_flush_failures += 1;
        } else {
            self.consecutive_flush_failures = 0;
        }

        let doc_count = lexical.stats().doc_count.max(1);
        let changed_fraction = changed.len() as f32 / doc_count as f32;
        let plan_cache_invalidated = changed_fraction > self.config.plan_cache_invalidate_fraction;
        if plan_cache_invalidated {
            plan_cache.clear();
        }

        self.total_indexed_docs += applied;
        self.flushing = false;

        if self.coalesced_flush_requested {
            self.coalesced_flush_requested = false;
            info!(pending = self.queue.len(), "coalesced flush request re-armed indexer");
        }

        self.state = if self.queue.is_empty() { IndexerState::Idle } else { IndexerState::Buffering };

        if matches!(self.health(), IndexerHealth::Degraded { .. }) {
            warn!(failures = self.consecutive_flush_failures, "incremental indexer is degraded");
        }

        FlushResult { applied, failed, latency_ms: start.elapsed().as_millis() as u64, plan_cache_invalidated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, QueryPlanCacheConfig};
    use crate::core::types::Entity;

    fn graph() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        let e = Entity::new("alice", "person").unwrap();
        g.entities.insert(e.name.clone(), e);
        g
    }

    #[test]
    fn batch_size_triggers_should_flush() {
        let mut indexer = IncrementalIndexer::new(IndexerConfig { batch_size: 2, plan_cache_invalidate_fraction: 0.5 });
        indexer.enqueue(IndexOp { kind: IndexOpKind::Add, name: "a".to_string() });
        assert!(!indexer.should_flush());
        indexer.enqueue(IndexOp { kind: IndexOpKind::Add, name: "b".to_string() });
        assert!(indexer.should_flush());
    }

    #[test]
    fn flush_applies_and_resets_queue() {
        let mut indexer = IncrementalIndexer::new(Config::default().indexer);
        let mut lexical = LexicalIndex::new();
        let mut cache = PlanCache::new(&QueryPlanCacheConfig::default());
        let g = graph();

        indexer.enqueue(IndexOp { kind: IndexOpKind::Add, name: "alice".to_string() });
        let result = indexer.flush(&g, &mut lexical, None, &HashMap::new(), &mut cache);

        assert_eq!(result.applied, 1);
        assert_eq!(indexer.pending(), 0);
        assert_eq!(indexer.state(), IndexerState::Idle);
    }

    #[test]
    fn three_empty_flushes_mark_degraded() {
        let mut indexer = IncrementalIndexer::new(Config::default().indexer);
        let mut lexical = LexicalIndex::new();
        let mut cache = PlanCache::new(&QueryPlanCacheConfig::default());
        let g = KnowledgeGraph::new();

        for _ in 0..3 {
            indexer.flush(&g, &mut lexical, None, &HashMap::new(), &mut cache);
        }
        assert!(matches!(indexer.health(), IndexerHealth::Degraded { .. }));
    }

    #[test]
    fn flush_writes_precomputed_embeddings_into_the_vector_store() {
        use crate::vector::store::InMemoryVectorStore;

        let mut indexer = IncrementalIndexer::new(Config::default().indexer);
        let mut lexical = LexicalIndex::new();
        let mut cache = PlanCache::new(&QueryPlanCacheConfig::default());
        let mut store = InMemoryVectorStore::new();
        let g = graph();

        indexer.enqueue(IndexOp { kind: IndexOpKind::Add, name: "alice".to_string() });
        let mut embeddings = HashMap::new();
        embeddings.insert("alice".to_string(), vec![1.0, 0.0]);
        let result = indexer.flush(&g, &mut lexical, Some(&mut store), &embeddings, &mut cache);

        assert_eq!(result.failed, 0);
        assert!(store.has("alice"));
    }
}
