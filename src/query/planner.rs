use crate::core::types::SymbolicFilters;
use crate::index::inverted::InvertedIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Lexical,
    Semantic,
    Fuzzy,
    Symbolic,
}

#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub layers: Vec<Layer>,
    pub top_k: usize,
}

impl QueryPlan {
    pub fn includes(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }
}

/// Builds a `QueryPlan` from the query text, supplied filters, and
/// whether an embedder is available (spec §4.9's Planner policy).
pub struct QueryPlanner;

impl QueryPlanner {
    pub fn plan(
        raw_query: &str,
        filters: &SymbolicFilters,
        embedder_configured: bool,
        index: &InvertedIndex,
        top_k: usize,
        force_fuzzy: bool,
    ) -> QueryPlan {
        let mut layers = Vec::new();
        let query_empty = raw_query.trim().is_empty();

        if !filters.is_empty() {
            layers.push(Layer::Symbolic);
        }
        if embedder_configured {
            layers.push(Layer::Semantic);
        }
        if !query_empty {
            layers.push(Layer::Lexical);
        }
        if !query_empty && (force_fuzzy || Self::misspelling_risk(raw_query, index)) {
            layers.push(Layer::Fuzzy);
        }

        QueryPlan { layers, top_k }
    }

    /// True when query tokens have a low hit rate in the inverted index,
    /// suggesting the user may have mistyped an entity name or term.
    fn misspelling_risk(raw_query: &str, index: &InvertedIndex) -> bool {
        let tokens: Vec<String> = raw_query.split_whitespace().map(|t| t.to_lowercase()).collect();
        if tokens.is_empty() {
            return false;
        }
        let hits = tokens.iter().filter(|t| index.doc_freq(t) > 0).count();
        (hits as f32 / tokens.len() as f32) < 0.5
    }
}
