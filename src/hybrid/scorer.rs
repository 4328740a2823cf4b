use std::collections::HashMap;

use crate::core::config::HybridConfig;
use crate::query::planner::Layer;
use crate::search::results::{ScoreExplanation, ScoredDocument};

/// Raw, unnormalized results produced by one active layer.
#[derive(Debug, Clone, Default)]
pub struct LayerResults {
    pub layer: Option<Layer>,
    pub scores: HashMap<String, f32>,
}

/// A fused, explainable match (spec §4.10).
#[derive(Debug, Clone)]
pub struct HybridMatch {
    pub name: String,
    pub combined: f32,
    pub raw_scores: HashMap<&'static str, f32>,
    pub matched_layers: Vec<&'static str>,
}

fn layer_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Lexical => "lexical",
        Layer::Semantic => "semantic",
        Layer::Fuzzy => "fuzzy",
        Layer::Symbolic => "symbolic",
    }
}

/// Min–max normalizes per-layer scores, redistributes weights across the
/// active layers, and fuses into a single ranked list.
pub struct HybridScorer {
    config: HybridConfig,
}

impl HybridScorer {
    pub fn new(config: HybridConfig) -> Self {
        HybridScorer { config }
    }

    /// `min = max` collapses every positive score to 1.0, every
    /// non-positive score to 0.0 — never a divide by zero.
    fn min_max_normalize(scores: &HashMap<String, f32>) -> HashMap<String, f32> {
        if scores.is_empty() {
            return HashMap::new();
        }
        let min = scores.values().copied().fold(f32::INFINITY, f32::min);
        let max = scores.values().copied().fold(f32::NEG_INFINITY, f32::max);

        if (max - min).abs() < f32::EPSILON {
            return scores.iter().map(|(k, v)| (k.clone(), if *v > 0.0 { 1.0 } else { 0.0 })).collect();
        }

        scores.iter().map(|(k, v)| (k.clone(), (v - min) / (max - min))).collect()
    }

    fn effective_weights(&self, active: &[Layer]) -> HashMap<Layer, f32> {
        let weights = &self.config.weights;
        let mut effective: HashMap<Layer, f32> = active
            .iter()
            .map(|&layer| {
                let w = match layer {
                    Layer::Semantic => weights.semantic,
                    Layer::Lexical => weights.lexical,
                    Layer::Symbolic => weights.symbolic,
                    Layer::Fuzzy => 0.0,
                };
                (layer, w)
            })
            .collect();

        if self.config.normalize_weights {
            let total: f32 = effective.values().sum();
            if total > 0.0 {
                for w in effective.values_mut() {
                    *w /= total;
                }
            }
        }
        effective
    }

    /// `entity_names` restricts fusion to entities present in the
    /// directory — layer hits for unknown entities are dropped.
    pub fn fuse(&self, layers: &[LayerResults], entity_names: &std::collections::HashSet<String>) -> Vec<HybridMatch> {
        let active: Vec<Layer> = layers.iter().filter_map(|l| l.layer).collect();
        let weights = self.effective_weights(&active);

        let normalized: Vec<(Layer, HashMap<String, f32>)> = layers
            .iter()
            .filter_map(|l| l.layer.map(|layer| (layer, Self::min_max_normalize(&l.scores))))
            .collect();

        let mut combined: HashMap<String, HybridMatch> = HashMap::new();

        for (layer, scores) in &normalized {
            let weight = weights.get(layer).copied().unwrap_or(0.0);
            for (name, normalized_score) in scores {
                if !entity_names.contains(name) {
                    continue;
                }
                let entry = combined.entry(name.clone()).or_insert_with(|| HybridMatch {
                    name: name.clone(),
                    combined: 0.0,
                    raw_scores: HashMap::new(),
                    matched_layers: Vec::new(),
                });
                entry.combined += weight * normalized_score;
                entry.raw_scores.insert(layer_name(*layer), *normalized_score);
                entry.matched_layers.push(layer_name(*layer));
            }
        }

        let mut results: Vec<HybridMatch> =
            combined.into_values().filter(|m| m.combined >= self.config.min_score).collect();
        results.sort_by(|a, b| {
            b.combined.partial_cmp(&a.combined).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.name.cmp(&b.name))
        });
        results
    }
}

impl From<HybridMatch> for ScoredDocument {
    fn from(m: HybridMatch) -> Self {
        let description = format!("layers: {}", m.matched_layers.join(","));
        ScoredDocument {
            name: m.name,
            score: m.combined,
            explanation: Some(ScoreExplanation { value: m.combined, description }),
        }
    }
}
