use crate::core::config::EarlyTerminationConfig;
use crate::hybrid::scorer::HybridMatch;
use crate::query::planner::Layer;

/// After each layer completes, checks whether the results collected so
/// far are "adequate" (spec §4.12): the top combined score clears the
/// threshold, there are enough results, and no symbolic filter is still
/// waiting to be applied.
pub struct EarlyTermination {
    config: EarlyTerminationConfig,
}

impl EarlyTermination {
    pub fn new(config: EarlyTerminationConfig) -> Self {
        EarlyTermination { config }
    }

    pub fn is_adequate(&self, results: &[HybridMatch], remaining_layers: &[Layer]) -> bool {
        let top_adequate = results.first().is_some_and(|m| m.combined >= self.config.adequacy_threshold);
        let enough_results = results.len() >= self.config.min_results;
        let symbolic_still_pending = remaining_layers.contains(&Layer::Symbolic);

        top_adequate && enough_results && !symbolic_still_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn adequate_when_threshold_and_count_met_with_no_pending_symbolic() {
        let early = EarlyTermination::new(EarlyTerminationConfig { adequacy_threshold: 0.8, min_results: 2 });
        let results = matches(&[0.9, 0.85]);
        assert!(early.is_adequate(&results, &[]));
    }

    #[test]
    fn not_adequate_when_symbolic_layer_still_pending() {
        let early = EarlyTermination::new(EarlyTerminationConfig { adequacy_threshold: 0.8, min_results: 2 });
        let results = matches(&[0.9, 0.85]);
        assert!(!early.is_adequate(&results, &[Layer::Symbolic]));
    }

    #[test]
    fn not_adequate_when_too_few_results() {
        let early = EarlyTermination::new(EarlyTerminationConfig { adequacy_threshold: 0.8, min_results: 2 });
        let results = matches(&[0.9]);
        assert!(!early.is_adequate(&results, &[]));
    }
}
