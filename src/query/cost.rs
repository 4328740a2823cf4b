use std::collections::HashMap;

use crate::query::planner::{Layer, QueryPlan};
use crate::query::types::{CostModel, IndexStatistics};

#[derive(Debug, Clone, Copy, Default)]
pub struct LayerCost {
    pub estimated_tokens: u64,
    pub estimated_latency_ms: f32,
}

#[derive(Debug, Clone, Default)]
pub struct CostEstimate {
    pub per_layer: HashMap<&'static str, LayerCost>,
    /// True when the estimator dropped the semantic layer for exceeding
    /// its token budget.
    pub dropped_semantic: bool,
    pub recommend_early_termination: bool,
}

pub struct CostEstimator {
    model: CostModel,
}

impl CostEstimator {
    pub fn new(model: CostModel) -> Self {
        CostEstimator { model }
    }

    fn layer_name(layer: Layer) -> &'static str {
        match layer {
            Layer::Lexical => "lexical",
            Layer::Semantic => "semantic",
            Layer::Fuzzy => "fuzzy",
            Layer::Symbolic => "symbolic",
        }
    }

    fn ns_per_doc(&self, layer: Layer) -> f32 {
        match layer {
            Layer::Lexical => self.model.lexical_ns_per_doc,
            Layer::Semantic => self.model.semantic_ns_per_doc,
            Layer::Fuzzy => self.model.fuzzy_ns_per_doc,
            Layer::Symbolic => self.model.symbolic_ns_per_doc,
        }
    }

    /// Estimate cost per planned layer; drops `Semantic` from the plan in
    /// place when its estimated token usage exceeds the configured
    /// budget (spec §4.9).
    pub fn estimate(&self, plan: &mut QueryPlan, stats: &IndexStatistics) -> CostEstimate {
        let mut estimate = CostEstimate::default();

        for &layer in &plan.layers {
            let doc_count = if layer == Layer::Semantic { stats.vector_count } else { stats.doc_count } as f32;
            let latency_ms = (doc_count * self.ns_per_doc(layer)) / 1_000_000.0;
            let estimated_tokens = if layer == Layer::Semantic {
                (stats.vector_count as u64).saturating_mul(4)
            } else {
                0
            };
            estimate.per_layer.insert(
                Self::layer_name(layer),
                LayerCost { estimated_tokens, estimated_latency_ms: latency_ms },
            );
        }

        if let Some(cost) = estimate.per_layer.get(Self::layer_name(Layer::Semantic)) {
            if cost.estimated_tokens > self.model.semantic_token_budget {
                estimate.dropped_semantic = true;
                plan.layers.retain(|&l| l != Layer::Semantic);
                estimate.per_layer.remove(Self::layer_name(Layer::Semantic));
            }
        }

        estimate.recommend_early_termination = plan.layers.len() > 1;
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_semantic_when_over_budget() {
        let mut model = CostModel::default();
        model.semantic_token_budget = 10;
        let estimator = CostEstimator::new(model);
        let mut plan = QueryPlan { layers: vec![Layer::Lexical, Layer::Semantic], top_k: 10 };
        let stats = IndexStatistics { doc_count: 100, term_count: 500, avg_doc_length: 5.0, vector_count: 100 };

        let estimate = estimator.estimate(&mut plan, &stats);
        assert!(estimate.dropped_semantic);
        assert!(!plan.includes(Layer::Semantic));
    }

    #[test]
    fn keeps_semantic_within_budget() {
        let estimator = CostEstimator::new(CostModel::default());
        let mut plan = QueryPlan { layers: vec![Layer::Semantic], top_k: 10 };
        let stats = IndexStatistics { doc_count: 10, term_count: 10, avg_doc_length: 5.0, vector_count: 10 };

        let estimate = estimator.estimate(&mut plan, &stats);
        assert!(!estimate.dropped_semantic);
        assert!(plan.includes(Layer::Semantic));
    }
}
