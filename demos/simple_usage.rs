/// End-to-end tour of the retrieval engine API:
/// - building the engine from a graph snapshot
/// - lexical (TF-IDF/BM25/boolean), fuzzy, and hybrid search
/// - incremental reindexing on entity change
/// - statistics and health checks
use std::sync::Arc;

use graphmind_retrieve::core::config::Config;
use graphmind_retrieve::core::types::{Entity, KnowledgeGraph, SymbolicFilters};
use graphmind_retrieve::embedder::MockEmbedder;
use graphmind_retrieve::graph::store::InMemoryGraphStore;
use graphmind_retrieve::indexer::incremental::IndexOpKind;
use graphmind_retrieve::{HybridSearchOptions, RetrievalEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building knowledge graph...");
    let mut graph = KnowledgeGraph::new();
    for (name, entity_type, observations) in [
        ("alice", "person", vec!["senior rust engineer", "works on the backend team"]),
        ("bob", "person", vec!["database systems researcher"]),
        ("techcorp", "organization", vec!["builds web applications"]),
    ] {
        let mut entity = Entity::new(name, entity_type)?;
        entity.observations = observations.into_iter().map(str::to_string).collect();
        graph.entities.insert(entity.name.clone(), entity);
    }

    let store = Arc::new(InMemoryGraphStore::with_graph(graph));
    let engine = Arc::new(RetrievalEngine::new(
        store,
        Config::default(),
        Some(Arc::new(MockEmbedder::new(32))),
    )?);
    engine.subscribe_to_store();
    println!("Engine ready.\n");

    println!("search_basic(\"rust\"):");
    for entity in engine.search_basic("rust", None)? {
        println!("  {}", entity.name);
    }

    println!("\nsearch_bm25(\"engineer\"):");
    for doc in engine.search_bm25("engineer", None, 5)? {
        println!("  {} ({:.3})", doc.name, doc.score);
    }

    println!("\nsearch_boolean(\"rust AND NOT database\"):");
    for doc in engine.search_boolean("rust AND NOT database", None, 5)? {
        println!("  {} ({:.3})", doc.name, doc.score);
    }

    println!("\nsearch_fuzzy(\"alise\"):");
    for doc in engine.search_fuzzy("alise", None, 5)? {
        println!("  {} ({:.3})", doc.name, doc.score);
    }

    println!("\nsearch_hybrid(\"backend engineer\"):");
    let mut filters = SymbolicFilters::default();
    filters.entity_types = Some(vec!["person".to_string()]);
    let result = engine
        .search_hybrid("backend engineer", filters, HybridSearchOptions::default())
        .await?;
    for m in &result.matches {
        println!("  {} ({:.3}, layers: {:?})", m.name, m.combined, m.matched_layers);
    }

    println!("\nUpdating alice's observations and reindexing...");
    engine.notify_change(IndexOpKind::Update, "alice").await?;

    println!("\nEngine stats:");
    let stats = engine.stats();
    println!("  entities: {}, inverted index terms: {}", stats.total_entities, stats.inverted_index_terms);

    println!("\nHealth check:");
    let health = engine.health_check();
    for check in &health.checks {
        println!("  {}: {:?}", check.name, check.status);
    }

    Ok(())
}
