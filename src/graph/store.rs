use crate::core::error::Result;
use crate::core::types::KnowledgeGraph;
use crate::graph::events::{EventBus, GraphEvent, GraphEventListener};

/// The contract the retrieval core consumes from the persistent graph
/// store (spec §6). Implementations (JSONL, relational-table, ...) live
/// outside this crate; only the interface is fixed here.
pub trait GraphStore: Send + Sync {
    /// Read-only snapshot of the current graph.
    fn load_graph(&self) -> Result<KnowledgeGraph>;

    /// Mutable working copy. MUST only be used while holding the graph
    /// mutex (spec §4.15).
    fn get_graph_for_mutation(&self) -> Result<KnowledgeGraph>;

    /// Atomically replace the persisted graph.
    fn save_graph(&self, graph: &KnowledgeGraph) -> Result<()>;

    /// Persist a single embedding. Optional: only meaningful for a
    /// persistent vector store variant.
    fn store_embedding(&self, _name: &str, _vector: &[f32], _model: &str) -> Result<()> {
        Ok(())
    }

    fn remove_embedding(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn load_all_embeddings(&self) -> Result<Vec<(String, Vec<f32>)>> {
        Ok(Vec::new())
    }

    fn clear_all_embeddings(&self) -> Result<()> {
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn GraphEventListener>);
}

/// Reference, in-memory `GraphStore` implementation. Used by tests and as
/// the default collaborator in examples; production deployments supply a
/// JSONL- or relational-table-backed implementation that satisfies the
/// same contract.
pub struct InMemoryGraphStore {
    graph: parking_lot::RwLock<KnowledgeGraph>,
    events: parking_lot::Mutex<EventBus>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        InMemoryGraphStore {
            graph: parking_lot::RwLock::new(KnowledgeGraph::new()),
            events: parking_lot::Mutex::new(EventBus::new()),
        }
    }

    pub fn with_graph(graph: KnowledgeGraph) -> Self {
        InMemoryGraphStore {
            graph: parking_lot::RwLock::new(graph),
            events: parking_lot::Mutex::new(EventBus::new()),
        }
    }

    pub fn emit(&self, event: GraphEvent) {
        self.events.lock().emit(event);
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for InMemoryGraphStore {
    fn load_graph(&self) -> Result<KnowledgeGraph> {
        Ok(self.graph.read().clone())
    }

    fn get_graph_for_mutation(&self) -> Result<KnowledgeGraph> {
        Ok(self.graph.read().clone())
    }

    fn save_graph(&self, graph: &KnowledgeGraph) -> Result<()> {
        *self.graph.write() = graph.clone();
        self.emit(GraphEvent::GraphSaved);
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn GraphEventListener>) {
        self.events.lock().subscribe(listener);
    }
}
