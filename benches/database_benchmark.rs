use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use tokio::runtime::Runtime;

use graphmind_retrieve::core::config::Config;
use graphmind_retrieve::core::types::{Entity, KnowledgeGraph, SymbolicFilters};
use graphmind_retrieve::embedder::MockEmbedder;
use graphmind_retrieve::graph::store::InMemoryGraphStore;
use graphmind_retrieve::{HybridSearchOptions, RetrievalEngine};

fn random_observation(rng: &mut impl Rng, words: usize) -> String {
    let vocab = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "rust", "engineer"];
    (0..words).map(|_| vocab[rng.gen_range(0..vocab.len())]).collect::<Vec<_>>().join(" ")
}

fn build_graph(doc_count: usize) -> KnowledgeGraph {
    let mut rng = rand::thread_rng();
    let mut graph = KnowledgeGraph::new();
    for i in 0..doc_count {
        let mut entity = Entity::new(format!("entity_{i}"), "document").unwrap();
        entity.observations = vec![random_observation(&mut rng, 20), format!("category_{}", i % 10)];
        graph.entities.insert(entity.name.clone(), entity);
    }
    graph
}

fn engine_for(doc_count: usize) -> Arc<RetrievalEngine> {
    let store = Arc::new(InMemoryGraphStore::with_graph(build_graph(doc_count)));
    Arc::new(RetrievalEngine::new(store, Config::default(), Some(Arc::new(MockEmbedder::new(32)))).unwrap())
}

/// Cost of building the full engine (lexical index + vector store) from a
/// graph snapshot, at increasing entity counts.
fn bench_engine_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_build");
    for &size in &[100usize, 1_000, 5_000] {
        let graph = build_graph(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| {
                let store = Arc::new(InMemoryGraphStore::with_graph(graph.clone()));
                let engine = RetrievalEngine::new(store, Config::default(), None).unwrap();
                black_box(engine);
            });
        });
    }
    group.finish();
}

fn bench_lexical_search(c: &mut Criterion) {
    let engine = engine_for(1_000);
    let mut group = c.benchmark_group("lexical_search");

    group.bench_function("ranked_tfidf", |b| {
        b.iter(|| engine.search_ranked(black_box("quick brown fox"), None, 10).unwrap());
    });
    group.bench_function("bm25", |b| {
        b.iter(|| engine.search_bm25(black_box("quick brown fox"), None, 10).unwrap());
    });
    group.bench_function("boolean_and", |b| {
        b.iter(|| engine.search_boolean(black_box("quick AND brown"), None, 10).unwrap());
    });
    group.bench_function("boolean_not", |b| {
        b.iter(|| engine.search_boolean(black_box("fox AND NOT lazy"), None, 10).unwrap());
    });
    group.bench_function("boolean_complex", |b| {
        b.iter(|| engine.search_boolean(black_box("(quick AND brown) OR (lazy AND dog)"), None, 10).unwrap());
    });

    group.finish();
}

fn bench_fuzzy_search(c: &mut Criterion) {
    let engine = engine_for(1_000);
    let mut group = c.benchmark_group("fuzzy_search");

    group.bench_function("whole_string_similarity", |b| {
        b.iter(|| engine.search_fuzzy(black_box("entty_5"), None, 10).unwrap());
    });
    group.bench_function("suggestions", |b| {
        b.iter(|| engine.get_suggestions(black_box("entty_5"), 5).unwrap());
    });

    group.finish();
}

fn bench_hybrid_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let engine = engine_for(1_000);
    let mut group = c.benchmark_group("hybrid_search");

    group.bench_function("lexical_plus_semantic", |b| {
        b.to_async(&rt).iter(|| async {
            let mut filters = SymbolicFilters::default();
            filters.entity_types = Some(vec!["document".to_string()]);
            let options = HybridSearchOptions { top_k: 10, force_fuzzy: false, allow_reflection: false };
            engine.search_hybrid(black_box("quick brown fox"), filters, options).await.unwrap()
        });
    });

    group.bench_function("with_reflection", |b| {
        b.to_async(&rt).iter(|| async {
            let options = HybridSearchOptions { top_k: 3, force_fuzzy: false, allow_reflection: true };
            engine
                .search_hybrid(black_box("extremely rare combination of terms"), SymbolicFilters::default(), options)
                .await
                .unwrap()
        });
    });

    group.finish();
}

/// Indexing throughput: flushing batches of incremental changes.
fn bench_incremental_indexing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("incremental_indexing");
    group.sample_size(10);

    group.bench_function("notify_change_batch_flush", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            use std::time::Instant;
            let engine = engine_for(500);
            let start = Instant::now();
            for i in 0..iters {
                engine
                    .notify_change(
                        graphmind_retrieve::indexer::incremental::IndexOpKind::Update,
                        format!("entity_{}", i as usize % 500),
                    )
                    .await
                    .unwrap();
            }
            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_engine_build,
    bench_lexical_search,
    bench_fuzzy_search,
    bench_hybrid_search,
    bench_incremental_indexing
);
criterion_main!(benches);
