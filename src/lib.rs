pub mod analysis;
pub mod cache;
pub mod concurrency;
pub mod core;
pub mod embedder;
pub mod engine;
pub mod graph;
pub mod hybrid;
pub mod index;
pub mod indexer;
pub mod query;
pub mod scoring;
pub mod search;
pub mod symbolic;
pub mod vector;

pub use core::config::Config;
pub use core::error::{Error, ErrorKind, Result};
pub use core::types::{Entity, KnowledgeGraph, Relation, SymbolicFilters};
pub use embedder::{Embedder, MockEmbedder, RetryingEmbedder};
pub use engine::{HybridSearchOptions, HybridSearchResult, RetrievalEngine};
pub use graph::store::{GraphStore, InMemoryGraphStore};
pub use search::results::ScoredDocument;
