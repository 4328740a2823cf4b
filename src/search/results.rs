use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Per-layer contribution to a combined score, kept for explainability
/// (spec §4.10).
#[derive(Debug, Clone)]
pub struct ScoreExplanation {
    pub value: f32,
    pub description: String,
}

/// A single ranked match, named by entity name rather than a numeric doc
/// id since entities are name-keyed throughout this crate.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub name: String,
    pub score: f32,
    pub explanation: Option<ScoreExplanation>,
}

impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.name == other.name
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) surfaces the *lowest*
        // score at its peek, making eviction in `TopKCollector` O(log k).
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Bounded top-k collector backed by a min-heap over score (spec §4.10's
/// "take top-K").
pub struct TopKCollector {
    heap: BinaryHeap<ScoredDocument>,
    k: usize,
    total_collected: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector { heap: BinaryHeap::with_capacity(k + 1), k, total_collected: 0 }
    }

    pub fn collect(&mut self, doc: ScoredDocument) {
        self.total_collected += 1;
        if self.k == 0 {
            return;
        }
        self.heap.push(doc);
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    pub fn total_collected(&self) -> usize {
        self.total_collected
    }

    /// Drain into a descending-by-score vector.
    pub fn into_sorted_vec(self) -> Vec<ScoredDocument> {
        let mut docs: Vec<_> = self.heap.into_vec();
        docs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then_with(|| a.name.cmp(&b.name)));
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_keeps_only_top_k() {
        let mut collector = TopKCollector::new(2);
        for (name, score) in [("a", 0.1), ("b", 0.9), ("c", 0.5)] {
            collector.collect(ScoredDocument { name: name.to_string(), score, explanation: None });
        }
        let top = collector.into_sorted_vec();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b");
        assert_eq!(top[1].name, "c");
    }
}
