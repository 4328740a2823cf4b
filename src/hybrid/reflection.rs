use crate::core::config::ReflectionConfig;
use crate::core::types::SymbolicFilters;
use crate::hybrid::scorer::HybridMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionState {
    Initial,
    Querying,
    Scoring,
    Satisfied,
    Refining,
}

/// A requery candidate produced by one refinement step (spec §4.13).
#[derive(Debug, Clone)]
pub struct RefinedQuery {
    pub top_k: usize,
    pub filters: SymbolicFilters,
    pub force_fuzzy: bool,
}

/// Iterative relax-and-requery loop. Tracks a signature history so an
/// identical refined query aborts the loop instead of cycling forever.
pub struct ReflectionManager {
    config: ReflectionConfig,
    history: Vec<String>,
    iterations: usize,
    state: ReflectionState,
}

impl ReflectionManager {
    pub fn new(config: ReflectionConfig) -> Self {
        ReflectionManager { config, history: Vec::new(), iterations: 0, state: ReflectionState::Initial }
    }

    pub fn state(&self) -> ReflectionState {
        self.state
    }

    /// `top1.combined >= minSatisfactoryScore AND len(results) >= minDesiredResults`.
    pub fn is_satisfied(&mut self, results: &[HybridMatch]) -> bool {
        self.state = ReflectionState::Scoring;
        let satisfied = results.first().is_some_and(|m| m.combined >= self.config.min_satisfactory_score)
            && results.len() >= self.config.min_desired_results;
        self.state = if satisfied { ReflectionState::Satisfied } else { ReflectionState::Refining };
        satisfied
    }

    /// Produces the next refined query, or `None` when the iteration
    /// budget is exhausted or the refinement would repeat a prior one.
    pub fn refine(&mut self, current: &RefinedQuery, fuzzy_already_included: bool) -> Option<RefinedQuery> {
        if self.iterations >= self.config.max_iterations {
            return None;
        }

        let mut next = current.clone();
        next.top_k = (next.top_k * 2).max(1);
        Self::relax_strictest_filter(&mut next.filters);
        next.force_fuzzy = !fuzzy_already_included;

        let signature = Self::signature(&next);
        if self.history.contains(&signature) {
            return None;
        }

        self.history.push(signature);
        self.iterations += 1;
        self.state = ReflectionState::Querying;
        Some(next)
    }

    /// Widens the importance range if present, otherwise drops one tag —
    /// the "strictest" predicate in practice is whichever most directly
    /// narrows the candidate set.
    fn relax_strictest_filter(filters: &mut SymbolicFilters) {
        if let Some(range) = filters.importance.as_mut() {
            range.min = range.min.map(|m| (m - 1.0).max(0.0));
            range.max = range.max.map(|m| (m + 1.0).min(10.0));
            return;
        }
        if let Some(tags) = filters.tags.as_mut() {
            if tags.len() > 1 {
                tags.pop();
            } else {
                filters.tags = None;
            }
        }
    }

    fn signature(query: &RefinedQuery) -> String {
        format!(
            "{}|{:?}|{:?}|{}",
            query.top_k, query.filters.tags, query.filters.importance.as_ref().map(|r| (r.min, r.max)), query.force_fuzzy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ImportanceRange;
    use std::collections::HashMap;

    fn matches(scores: &[f32]) -> Vec<HybridMatch> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| HybridMatch {
                name: format!("doc{i}"),
                combined: *s,
                raw_scores: HashMap::new(),
                matched_layers: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn stops_after_max_iterations() {
        let mut manager = ReflectionManager::new(ReflectionConfig {
            min_satisfactory_score: 0.9,
            min_desired_results: 10,
            max_iterations: 2,
        });
        let mut query = RefinedQuery { top_k: 5, filters: SymbolicFilters::default(), force_fuzzy: false };
        let mut refinements = 0;
        while let Some(next) = manager.refine(&query, false) {
            query = next;
            refinements += 1;
        }
        assert_eq!(refinements, 2);
    }

    #[test]
    fn satisfied_requires_score_and_count() {
        let mut manager =
            ReflectionManager::new(ReflectionConfig { min_satisfactory_score: 0.7, min_desired_results: 2, max_iterations: 3 });
        assert!(!manager.is_satisfied(&matches(&[0.9])));
        assert!(manager.is_satisfied(&matches(&[0.9, 0.8])));
    }

    #[test]
    fn relaxes_importance_before_dropping_tags() {
        let mut filters = SymbolicFilters::default();
        filters.importance = Some(ImportanceRange { min: Some(5.0), max: Some(5.0) });
        filters.tags = Some(vec!["a".to_string()]);
        ReflectionManager::relax_strictest_filter(&mut filters);
        assert_eq!(filters.importance.unwrap().min, Some(4.0));
        assert_eq!(filters.tags, Some(vec!["a".to_string()]));
    }
}
