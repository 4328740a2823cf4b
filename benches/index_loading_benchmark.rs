use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use graphmind_retrieve::core::config::Bm25Config;
use graphmind_retrieve::core::types::{Entity, KnowledgeGraph};
use graphmind_retrieve::index::lexical::LexicalIndex;

fn build_graph(doc_count: usize) -> KnowledgeGraph {
    let mut rng = rand::thread_rng();
    let vocab = ["rust", "programming", "search", "engine", "database", "index", "query", "document"];
    let mut graph = KnowledgeGraph::new();
    for i in 0..doc_count {
        let mut entity = Entity::new(format!("doc_{i}"), "document").unwrap();
        let text: String = (0..20).map(|_| vocab[rng.gen_range(0..vocab.len())]).collect::<Vec<_>>().join(" ");
        entity.observations = vec![text];
        graph.entities.insert(entity.name.clone(), entity);
    }
    graph
}

/// Cost of a full index build at increasing corpus sizes — the closest
/// analog this crate has to "index loading" (there is no on-disk segment
/// format; the index is always rebuilt in memory from a graph snapshot).
fn bench_full_build(c: &mut Criterion) {
    let small = build_graph(100);
    let medium = build_graph(1_000);

    let mut group = c.benchmark_group("full_build");
    group.bench_with_input(BenchmarkId::new("build_index", "small_100_docs"), &small, |b, graph| {
        b.iter(|| {
            let mut index = LexicalIndex::new();
            index.build_index(black_box(graph));
            black_box(&index);
        });
    });
    group.bench_with_input(BenchmarkId::new("build_index", "medium_1000_docs"), &medium, |b, graph| {
        b.iter(|| {
            let mut index = LexicalIndex::new();
            index.build_index(black_box(graph));
            black_box(&index);
        });
    });
    group.finish();
}

/// Cost of an incremental partial re-index (spec §4.14) against a
/// pre-built index of increasing size, compared to a full rebuild of the
/// same size. This is the actual trade-off the incremental indexer
/// exists to win.
fn bench_incremental_vs_full(c: &mut Criterion) {
    let graph = build_graph(2_000);
    let changed: Vec<String> = (0..50).map(|i| format!("doc_{i}")).collect();

    let mut group = c.benchmark_group("incremental_vs_full");

    group.bench_function("full_rebuild_2000_docs", |b| {
        b.iter(|| {
            let mut index = LexicalIndex::new();
            index.build_index(black_box(&graph));
            black_box(&index);
        });
    });

    group.bench_function("incremental_update_50_of_2000", |b| {
        let mut index = LexicalIndex::new();
        index.build_index(&graph);
        b.iter(|| {
            index.update_index(black_box(&graph), black_box(&changed));
        });
    });

    group.finish();
}

fn bench_term_lookup(c: &mut Criterion) {
    let graph = build_graph(1_000);
    let mut index = LexicalIndex::new();
    index.build_index(&graph);
    let bm25 = Bm25Config::default();

    let mut group = c.benchmark_group("term_lookup");

    group.bench_function("tfidf_single_term", |b| {
        b.iter(|| black_box(index.score_tfidf(black_box("rust"))));
    });
    group.bench_function("bm25_single_term", |b| {
        b.iter(|| black_box(index.score_bm25(black_box("rust"), &bm25)));
    });
    group.bench_function("inverted_postings_lookup", |b| {
        b.iter(|| black_box(index.inverted().postings(black_box("rust"))));
    });

    group.finish();
}

criterion_group!(benches, bench_full_build, bench_incremental_vs_full, bench_term_lookup);
criterion_main!(benches);
