use crate::core::config::Limits;
use crate::core::error::{Error, Result};

/// Snapshot of index shape the planner and cost estimator read from (spec
/// §4.9). Refreshed by the incremental indexer after every flush.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStatistics {
    pub doc_count: usize,
    pub term_count: usize,
    pub avg_doc_length: f32,
    pub vector_count: usize,
}

/// Per-layer cost coefficients, tuned independently of the data; the
/// estimator multiplies these by `IndexStatistics` to get a plan's cost.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    pub lexical_ns_per_doc: f32,
    pub semantic_ns_per_doc: f32,
    pub fuzzy_ns_per_doc: f32,
    pub symbolic_ns_per_doc: f32,
    pub semantic_token_budget: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            lexical_ns_per_doc: 50.0,
            semantic_ns_per_doc: 400.0,
            fuzzy_ns_per_doc: 600.0,
            symbolic_ns_per_doc: 20.0,
            semantic_token_budget: 200_000,
        }
    }
}

/// Limits enforced before a query is planned at all (spec §4.17's
/// `QueryTooComplex`).
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    pub max_query_terms: usize,
    pub max_query_length: usize,
    pub max_query_depth: usize,
}

impl From<&Limits> for ValidationConfig {
    fn from(limits: &Limits) -> Self {
        ValidationConfig {
            max_query_terms: limits.max_query_terms,
            max_query_length: limits.max_query_length,
            max_query_depth: limits.max_query_depth,
        }
    }
}

pub struct QueryValidator {
    config: ValidationConfig,
}

impl QueryValidator {
    pub fn new(config: ValidationConfig) -> Self {
        QueryValidator { config }
    }

    pub fn validate(&self, raw_query: &str, term_count: usize, depth: usize) -> Result<()> {
        if raw_query.len() > self.config.max_query_length {
            return Err(Error::query_too_complex(format!(
                "query length {} exceeds limit {}",
                raw_query.len(),
                self.config.max_query_length
            )));
        }
        if term_count > self.config.max_query_terms {
            return Err(Error::query_too_complex(format!(
                "query term count {} exceeds limit {}",
                term_count, self.config.max_query_terms
            )));
        }
        if depth > self.config.max_query_depth {
            return Err(Error::query_too_complex(format!(
                "query nesting depth {} exceeds limit {}",
                depth, self.config.max_query_depth
            )));
        }
        Ok(())
    }
}
