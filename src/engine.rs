use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use parking_lot::RwLock;
use tracing::warn;

use crate::cache::embedding::EmbeddingCache;
use crate::concurrency::mutex::GraphMutex;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::{EngineStats, HealthCheck, HealthCheckResult, HealthStatus, IndexerHealth};
use crate::core::types::{Entity, KnowledgeGraph, SymbolicFilters};
use crate::embedder::{Embedder, DOCUMENT_PREFIX, QUERY_PREFIX};
use crate::graph::events::{GraphEvent, GraphEventListener};
use crate::graph::store::GraphStore;
use crate::hybrid::executor::{LayerFuture, ParallelExecutor};
use crate::hybrid::reflection::{RefinedQuery, ReflectionManager};
use crate::hybrid::scorer::{HybridMatch, HybridScorer, LayerResults};
use crate::index::lexical::LexicalIndex;
use crate::indexer::incremental::{IndexOp, IndexOpKind, IncrementalIndexer};
use crate::query::ast::BoolExpr;
use crate::query::cache::{PlanCache, PlanCacheKey};
use crate::query::cost::{CostEstimate, CostEstimator};
use crate::query::matcher::BooleanMatcher;
use crate::query::parser::{looks_boolean, parse_boolean};
use crate::query::planner::{Layer, QueryPlan, QueryPlanner};
use crate::query::types::{CostModel, IndexStatistics, QueryValidator, ValidationConfig};
use crate::search::fuzzy::{FuzzyCandidate, FuzzySearcher};
use crate::search::results::{ScoreExplanation, ScoredDocument, TopKCollector};
use crate::symbolic::filter::SymbolicEvaluator;
use crate::vector::store::{build_vector_store, VectorStore, VectorStoreKind};

/// Options accepted by [`RetrievalEngine::search_hybrid`] beyond the query
/// text and filters (spec §6).
#[derive(Debug, Clone)]
pub struct HybridSearchOptions {
    pub top_k: usize,
    pub force_fuzzy: bool,
    pub allow_reflection: bool,
}

impl Default for HybridSearchOptions {
    fn default() -> Self {
        HybridSearchOptions { top_k: 10, force_fuzzy: false, allow_reflection: true }
    }
}

/// The fused result of a hybrid search, plus enough bookkeeping to explain
/// how it was produced (spec §4.9-§4.13).
#[derive(Debug, Clone)]
pub struct HybridSearchResult {
    pub matches: Vec<HybridMatch>,
    pub plan: QueryPlan,
    pub reflection_iterations: usize,
    pub cost_estimate: CostEstimate,
}

/// Composition root: wires the lexical, semantic, fuzzy, and symbolic
/// layers to a single `GraphStore` and exposes the public retrieval API
/// (spec §6). Index state is held behind `RwLock`s rather than the graph
/// mutex — reads take a point-in-time snapshot of the graph and never
/// need to serialize with writers; only the store's own mutation path
/// does (spec §4.15).
pub struct RetrievalEngine {
    store: Arc<dyn GraphStore>,
    config: Config,
    mutex: GraphMutex,
    lexical: Arc<RwLock<LexicalIndex>>,
    vector_store: Arc<RwLock<Box<dyn VectorStore>>>,
    embedding_cache: Arc<RwLock<EmbeddingCache>>,
    plan_cache: Arc<RwLock<PlanCache>>,
    indexer: Arc<RwLock<IncrementalIndexer>>,
    embedder: Option<Arc<dyn Embedder>>,
    fuzzy: Arc<FuzzySearcher>,
    started_at: Instant,
    queries_served: AtomicU64,
}

impl RetrievalEngine {
    /// Builds the engine and performs a full initial index build from
    /// whatever `store` currently holds.
    pub fn new(store: Arc<dyn GraphStore>, config: Config, embedder: Option<Arc<dyn Embedder>>) -> Result<Self> {
        let graph = store.load_graph()?;

        let mut lexical = LexicalIndex::new();
        lexical.build_index(&graph);

        let vector_kind = match (config.vector.persist, config.vector.quantize) {
            (true, _) => VectorStoreKind::Persistent,
            (false, crate::core::config::VectorQuantization::None) => VectorStoreKind::InMemory,
            (false, crate::core::config::VectorQuantization::Int8) => VectorStoreKind::Quantized,
        };
        let model_id = embedder.as_ref().map_or_else(String::new, |e| e.model_id().to_string());
        // `Persistent` reloads every embedding `store` already has via
        // `GraphStore::load_all_embeddings`, so a restart never needs to
        // re-embed anything the indexer previously flushed (spec §4.5).
        let vector_store = build_vector_store(vector_kind, Some(store.clone()), &model_id)?;

        Ok(RetrievalEngine {
            mutex: GraphMutex::new(config.mutex.clone()),
            lexical: Arc::new(RwLock::new(lexical)),
            vector_store: Arc::new(RwLock::new(vector_store)),
            embedding_cache: Arc::new(RwLock::new(EmbeddingCache::new(&config.embedding_cache))),
            plan_cache: Arc::new(RwLock::new(PlanCache::new(&config.query_plan_cache))),
            indexer: Arc::new(RwLock::new(IncrementalIndexer::new(config.indexer.clone()))),
            fuzzy: Arc::new(FuzzySearcher::new(config.fuzzy.clone())),
            embedder,
            store,
            config,
            started_at: Instant::now(),
            queries_served: AtomicU64::new(0),
        })
    }

    /// The graph mutex guarding the store's own mutation path (spec
    /// §4.15). The retrieval core never acquires it for reads.
    pub fn graph_mutex(&self) -> &GraphMutex {
        &self.mutex
    }

    /// Registers this engine as the store's single event subscriber, so
    /// entity/observation changes drive the incremental indexer
    /// automatically (spec §4.14 and §6's event list).
    pub fn subscribe_to_store(self: &Arc<Self>) {
        self.store.subscribe(Box::new(EngineEventListener { engine: self.clone() }));
    }

    /// Enqueues a change with the incremental indexer, flushing
    /// immediately once the configured batch size is reached (spec
    /// §4.14). When an embedder is configured, a flush computes a fresh
    /// embedding for every queued `Add`/`Update` and writes it to the
    /// vector store before reporting success.
    pub async fn notify_change(&self, kind: IndexOpKind, name: impl Into<String>) -> Result<()> {
        let should_flush = {
            let mut indexer = self.indexer.write();
            indexer.enqueue(IndexOp { kind, name: name.into() });
            indexer.should_flush()
        };
        if should_flush {
            self.flush_pending().await?;
        }
        Ok(())
    }

    /// Computes embeddings for the currently queued `Add`/`Update` ops
    /// (the only genuinely async step) without holding the indexer lock
    /// across the `.await`, then applies the whole batch synchronously.
    async fn flush_pending(&self) -> Result<()> {
        let graph = self.store.load_graph()?;

        let mut embeddings = HashMap::new();
        if let Some(embedder) = &self.embedder {
            let pending: Vec<String> = {
                let indexer = self.indexer.read();
                indexer.queued_ops().filter(|op| op.kind != IndexOpKind::Delete).map(|op| op.name.clone()).collect()
            };
            for name in pending {
                let Some(entity) = graph.entity(&name) else { continue };
                let text = format!("{DOCUMENT_PREFIX}{}", entity.indexable_text());
                match embedder.embed(&text).await {
                    Ok(vector) => {
                        embeddings.insert(name, vector);
                    }
                    Err(e) => warn!(name = %name, error = %e, "failed to embed entity during indexer flush"),
                }
            }
        }

        let mut indexer = self.indexer.write();
        let mut lexical = self.lexical.write();
        let mut vector_store = self.vector_store.write();
        let mut plan_cache = self.plan_cache.write();
        indexer.flush(&graph, &mut lexical, Some(&mut **vector_store), &embeddings, &mut plan_cache);
        Ok(())
    }

    /// Substring fallback over every entity's indexable text (spec §6).
    pub fn search_basic(&self, query: &str, filters: Option<&SymbolicFilters>) -> Result<Vec<Entity>> {
        let graph = self.store.load_graph()?;
        let needle = query.to_lowercase();
        let mut matches: Vec<Entity> = graph
            .entities
            .values()
            .filter(|e| e.indexable_text().to_lowercase().contains(&needle))
            .filter(|e| match filters {
                Some(f) => SymbolicEvaluator::new(f).evaluate(e).matches,
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }

    /// TF-IDF ranked search (spec §4.3).
    pub fn search_ranked(&self, query: &str, filters: Option<&SymbolicFilters>, limit: usize) -> Result<Vec<ScoredDocument>> {
        let graph = self.store.load_graph()?;
        let scores = self.lexical.read().score_tfidf(query);
        Ok(self.finalize_lexical(scores, &graph, filters, limit, "tfidf"))
    }

    /// BM25 ranked search (spec §4.4).
    pub fn search_bm25(&self, query: &str, filters: Option<&SymbolicFilters>, limit: usize) -> Result<Vec<ScoredDocument>> {
        let graph = self.store.load_graph()?;
        let scores = self.lexical.read().score_bm25(query, &self.config.bm25);
        Ok(self.finalize_lexical(scores, &graph, filters, limit, "bm25"))
    }

    fn finalize_lexical(
        &self,
        scores: Vec<(String, f32)>,
        graph: &KnowledgeGraph,
        filters: Option<&SymbolicFilters>,
        limit: usize,
        method: &'static str,
    ) -> Vec<ScoredDocument> {
        let mut collector = TopKCollector::new(limit);
        for (name, score) in scores {
            let Some(entity) = graph.entity(&name) else { continue };
            if let Some(f) = filters {
                if !SymbolicEvaluator::new(f).evaluate(entity).matches {
                    continue;
                }
            }
            collector.collect(ScoredDocument {
                name,
                score,
                explanation: Some(ScoreExplanation { value: score, description: method.to_string() }),
            });
        }
        collector.into_sorted_vec()
    }

    /// Boolean query search: AND/OR/NOT/quoted-phrase/parentheses over
    /// the same inverted index TF-IDF uses (spec §4.9's "structured
    /// lexical" case). Ranked by summed term frequency over the literal
    /// terms named in `expr`, normalized by document length, so a
    /// `NOT`-only query still ranks its (zero-scoring) matches instead
    /// of dropping them, unlike `score_tfidf`'s zero-score exclusion.
    pub fn search_boolean(&self, expr: &str, filters: Option<&SymbolicFilters>, limit: usize) -> Result<Vec<ScoredDocument>> {
        let ast = parse_boolean(expr)?;
        let terms = ast.terms();
        let validator = QueryValidator::new(ValidationConfig::from(&self.config.limits));
        validator.validate(expr, terms.len(), Self::expr_depth(&ast))?;

        let graph = self.store.load_graph()?;
        let lexical = self.lexical.read();
        let matching = BooleanMatcher::new(lexical.inverted()).matching_docs(&ast);

        let mut collector = TopKCollector::new(limit);
        for name in matching {
            let Some(entity) = graph.entity(&name) else { continue };
            if let Some(f) = filters {
                if !SymbolicEvaluator::new(f).evaluate(entity).matches {
                    continue;
                }
            }
            let doc_len = lexical.inverted().doc_length(&name).unwrap_or(1).max(1) as f32;
            let score = terms
                .iter()
                .map(|t| {
                    lexical
                        .inverted()
                        .postings(t)
                        .and_then(|list| list.get(&name))
                        .map(|p| p.term_freq as f32)
                        .unwrap_or(0.0)
                })
                .sum::<f32>()
                / doc_len;
            collector.collect(ScoredDocument { name, score, explanation: None });
        }
        Ok(collector.into_sorted_vec())
    }

    fn expr_depth(expr: &BoolExpr) -> usize {
        match expr {
            BoolExpr::Term(_) | BoolExpr::Phrase(_) => 1,
            BoolExpr::Not(inner) => 1 + Self::expr_depth(inner),
            BoolExpr::And(l, r) | BoolExpr::Or(l, r) => 1 + Self::expr_depth(l).max(Self::expr_depth(r)),
        }
    }

    /// Levenshtein-similarity search over names and observations (spec
    /// §4.8), with an optional per-call threshold override.
    pub fn search_fuzzy(&self, query: &str, threshold: Option<f32>, limit: usize) -> Result<Vec<ScoredDocument>> {
        let graph = self.store.load_graph()?;
        let candidates: Vec<FuzzyCandidate> =
            graph.entities.values().map(|e| FuzzyCandidate { name: &e.name, observations: &e.observations }).collect();

        let mut results = self.fuzzy.search(query, &candidates);
        if let Some(threshold) = threshold {
            results.retain(|m| m.score >= threshold);
        }
        let mut collector = TopKCollector::new(limit);
        for doc in results {
            collector.collect(doc);
        }
        Ok(collector.into_sorted_vec())
    }

    /// "Did you mean?" suggestions (spec §4.8).
    pub fn get_suggestions(&self, query: &str, max: usize) -> Result<Vec<String>> {
        let graph = self.store.load_graph()?;
        let candidates: Vec<FuzzyCandidate> =
            graph.entities.values().map(|e| FuzzyCandidate { name: &e.name, observations: &e.observations }).collect();
        Ok(self.fuzzy.suggest(query, &candidates, max).into_iter().map(|d| d.name).collect())
    }

    /// Dense-vector cosine search (spec §4.5). Requires an `Embedder` to
    /// have been configured at construction.
    pub async fn search_semantic(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        let embedder =
            self.embedder.clone().ok_or_else(|| Error::validation("semantic search requires a configured embedder"))?;
        let vector = self.embed_query(&embedder, query).await?;
        let matches = self.vector_store.read().search(&vector, limit)?;
        Ok(matches.into_iter().map(|m| ScoredDocument { name: m.name, score: m.score, explanation: None }).collect())
    }

    async fn embed_query(&self, embedder: &Arc<dyn Embedder>, query: &str) -> Result<Vec<f32>> {
        let cache_key = format!("query:{query}");
        if let Some(vector) = self.embedding_cache.write().get(&cache_key, query) {
            return Ok(vector);
        }
        let vector = embedder.embed(&format!("{QUERY_PREFIX}{query}")).await?;
        self.embedding_cache.write().set(&cache_key, query, vector.clone());
        Ok(vector)
    }

    /// Orchestrates the planner, parallel executor, hybrid scorer, and
    /// (optionally) the reflection re-query loop (spec §4.9-§4.13).
    pub async fn search_hybrid(
        &self,
        query: &str,
        filters: SymbolicFilters,
        options: HybridSearchOptions,
    ) -> Result<HybridSearchResult> {
        let validator = QueryValidator::new(ValidationConfig::from(&self.config.limits));
        let term_count = query.split_whitespace().count();
        let depth = if looks_boolean(query) { parse_boolean(query).map(|e| Self::expr_depth(&e)).unwrap_or(1) } else { 1 };
        validator.validate(query, term_count, depth)?;

        let top_k = options.top_k.max(1);
        let mut plan = self.plan_for(query, &filters, top_k, options.force_fuzzy)?;

        let stats = self.index_statistics();
        let cost_estimator = CostEstimator::new(CostModel::default());
        let cost_estimate = cost_estimator.estimate(&mut plan, &stats);

        let mut current_filters = filters;
        let mut current_plan = plan;
        let mut reflection = ReflectionManager::new(self.config.reflection.clone());
        let mut reflection_iterations = 0usize;

        let mut matches = self.run_plan(query, &current_filters, &current_plan).await?;

        if options.allow_reflection {
            let mut refined = RefinedQuery {
                top_k: current_plan.top_k,
                filters: current_filters.clone(),
                force_fuzzy: current_plan.includes(Layer::Fuzzy),
            };
            while !reflection.is_satisfied(&matches) {
                let fuzzy_included = current_plan.includes(Layer::Fuzzy);
                match reflection.refine(&refined, fuzzy_included) {
                    Some(next) => {
                        refined = next;
                        current_filters = refined.filters.clone();
                        current_plan = {
                            let lexical = self.lexical.read();
                            QueryPlanner::plan(
                                query,
                                &current_filters,
                                self.embedder.is_some(),
                                lexical.inverted(),
                                refined.top_k,
                                refined.force_fuzzy,
                            )
                        };
                        reflection_iterations += 1;
                        matches = self.run_plan(query, &current_filters, &current_plan).await?;
                    }
                    None => break,
                }
            }
        }

        Ok(HybridSearchResult { matches, plan: current_plan, reflection_iterations, cost_estimate })
    }

    fn index_statistics(&self) -> IndexStatistics {
        let lexical = self.lexical.read();
        let idx_stats = lexical.stats();
        IndexStatistics {
            doc_count: idx_stats.doc_count,
            term_count: idx_stats.term_count,
            avg_doc_length: lexical.inverted().avg_doc_length(),
            vector_count: self.vector_store.read().size(),
        }
    }

    fn plan_for(&self, query: &str, filters: &SymbolicFilters, top_k: usize, force_fuzzy: bool) -> Result<QueryPlan> {
        let key = PlanCacheKey::new(query, filters, top_k);
        if let Some(plan) = self.plan_cache.write().get(&key) {
            return Ok(plan);
        }
        let plan = {
            let lexical = self.lexical.read();
            QueryPlanner::plan(query, filters, self.embedder.is_some(), lexical.inverted(), top_k, force_fuzzy)
        };
        self.plan_cache.write().put(key, plan.clone());
        Ok(plan)
    }

    /// Fans a plan's active layers out to the parallel executor and
    /// fuses the results with the hybrid scorer. Lexical, symbolic, and
    /// fuzzy layers are synchronous and in-memory, so their "futures"
    /// resolve immediately; semantic is the one layer with genuine async
    /// I/O (the embedder call), which is why it is the layer the
    /// per-layer timeout actually protects against in practice.
    async fn run_plan(&self, query: &str, filters: &SymbolicFilters, plan: &QueryPlan) -> Result<Vec<HybridMatch>> {
        let graph = Arc::new(self.store.load_graph()?);
        let mut tasks: Vec<(Layer, LayerFuture)> = Vec::new();

        if plan.includes(Layer::Lexical) {
            let lexical = self.lexical.clone();
            let bm25 = self.config.bm25.clone();
            let query = query.to_string();
            tasks.push((
                Layer::Lexical,
                Box::pin(async move {
                    let scores = lexical.read().score_bm25(&query, &bm25).into_iter().collect();
                    Ok(LayerResults { layer: Some(Layer::Lexical), scores })
                }),
            ));
        }

        if plan.includes(Layer::Symbolic) {
            let graph = graph.clone();
            let filters = filters.clone();
            tasks.push((
                Layer::Symbolic,
                Box::pin(async move {
                    let evaluator = SymbolicEvaluator::new(&filters);
                    let scores = graph
                        .entities
                        .values()
                        .filter_map(|e| {
                            let result = evaluator.evaluate(e);
                            result.matches.then_some((e.name.clone(), result.score))
                        })
                        .collect();
                    Ok(LayerResults { layer: Some(Layer::Symbolic), scores })
                }),
            ));
        }

        if plan.includes(Layer::Fuzzy) {
            let graph = graph.clone();
            let fuzzy = self.fuzzy.clone();
            let query = query.to_string();
            let top_k = plan.top_k;
            tasks.push((
                Layer::Fuzzy,
                Box::pin(async move {
                    let candidates: Vec<FuzzyCandidate> =
                        graph.entities.values().map(|e| FuzzyCandidate { name: &e.name, observations: &e.observations }).collect();
                    let mut collector = TopKCollector::new(top_k);
                    for doc in fuzzy.search(&query, &candidates) {
                        collector.collect(doc);
                    }
                    let scores = collector.into_sorted_vec().into_iter().map(|d| (d.name, d.score)).collect();
                    Ok(LayerResults { layer: Some(Layer::Fuzzy), scores })
                }),
            ));
        }

        if plan.includes(Layer::Semantic) {
            if let Some(embedder) = self.embedder.clone() {
                let vector_store = self.vector_store.clone();
                let embedding_cache = self.embedding_cache.clone();
                let query = query.to_string();
                let top_k = plan.top_k;
                tasks.push((
                    Layer::Semantic,
                    Box::pin(async move {
                        let cache_key = format!("query:{query}");
                        let cached = embedding_cache.write().get(&cache_key, &query);
                        let vector = match cached {
                            Some(v) => v,
                            None => {
                                let v = embedder.embed(&format!("{QUERY_PREFIX}{query}")).await?;
                                embedding_cache.write().set(&cache_key, &query, v.clone());
                                v
                            }
                        };
                        let matches = vector_store.read().search(&vector, top_k)?;
                        let scores = matches.into_iter().map(|m| (m.name, m.score)).collect();
                        Ok(LayerResults { layer: Some(Layer::Semantic), scores })
                    }),
                ));
            } else {
                warn!("plan included the semantic layer but no embedder is configured; skipping");
            }
        }

        let executor = ParallelExecutor::new(self.config.parallel.per_layer_timeout_ms);
        let report = executor.execute(tasks).await?;

        let entity_names: HashSet<String> = graph.entities.keys().cloned().collect();
        let scorer = HybridScorer::new(self.config.hybrid.clone());
        self.queries_served.fetch_add(1, Ordering::Relaxed);
        Ok(scorer.fuse(&report.results, &entity_names))
    }

    /// Engine-wide statistics for monitoring (spec's ambient observability
    /// surface, not a retrieval feature).
    pub fn stats(&self) -> EngineStats {
        let graph = self.store.load_graph().unwrap_or_default();
        let lexical_stats = self.lexical.read().stats();
        EngineStats {
            uptime_secs: self.started_at.elapsed().as_secs(),
            total_entities: graph.entities.len(),
            total_relations: graph.relations.len(),
            inverted_index_terms: lexical_stats.term_count,
            vector_count: self.vector_store.read().size(),
            embedding_cache: self.embedding_cache.read().stats(),
            plan_cache: self.plan_cache.read().stats(),
            indexer_state: self.indexer.read().health(),
            queries_served: self.queries_served.load(Ordering::Relaxed),
        }
    }

    pub fn health_check(&self) -> HealthCheckResult {
        let mut checks = Vec::new();

        let indexer_status = match self.indexer.read().health() {
            IndexerHealth::Healthy => HealthStatus::Healthy,
            IndexerHealth::Degraded { consecutive_flush_failures } => {
                HealthStatus::Degraded(format!("{consecutive_flush_failures} consecutive empty/failed flushes"))
            }
        };
        checks.push(HealthCheck { name: "indexer".to_string(), status: indexer_status, message: None });

        let store_status = match self.store.load_graph() {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };
        checks.push(HealthCheck { name: "graph_store".to_string(), status: store_status, message: None });

        let overall = if checks.iter().any(|c| matches!(c.status, HealthStatus::Unhealthy(_))) {
            HealthStatus::Unhealthy("one or more subsystems unhealthy".to_string())
        } else if checks.iter().any(|c| matches!(c.status, HealthStatus::Degraded(_))) {
            HealthStatus::Degraded("one or more subsystems degraded".to_string())
        } else {
            HealthStatus::Healthy
        };

        HealthCheckResult { status: overall, checks, timestamp: SystemTime::now() }
    }
}

/// Maps a graph event to the incremental-indexer op it implies, if any.
fn index_op_for_event(event: &GraphEvent) -> Option<(IndexOpKind, String)> {
    match event {
        GraphEvent::EntityCreated(e) => Some((IndexOpKind::Add, e.name.clone())),
        GraphEvent::EntityUpdated(e) => Some((IndexOpKind::Update, e.name.clone())),
        GraphEvent::EntityDeleted { name } => Some((IndexOpKind::Delete, name.clone())),
        GraphEvent::ObservationAdded { entity, .. } => Some((IndexOpKind::Update, entity.clone())),
        GraphEvent::ObservationDeleted { entity, .. } => Some((IndexOpKind::Update, entity.clone())),
        GraphEvent::RelationCreated(_)
        | GraphEvent::RelationDeleted { .. }
        | GraphEvent::GraphSaved
        | GraphEvent::GraphLoaded => None,
    }
}

struct EngineEventListener {
    engine: Arc<RetrievalEngine>,
}

impl GraphEventListener for EngineEventListener {
    /// Event delivery itself stays synchronous (spec §6); the embedding
    /// step `notify_change` may need is queued onto the async runtime
    /// instead of blocking the emitter.
    fn on_event(&self, event: &GraphEvent) {
        let Some((kind, name)) = index_op_for_event(event) else { return };
        let engine = self.engine.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.notify_change(kind, name).await {
                warn!(error = %e, "failed to apply graph event to retrieval indexes");
            }
        });
    }
}
