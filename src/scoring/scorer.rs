use crate::core::config::Bm25Config;
use crate::index::lexical::LexicalIndex;

/// A named, ranked match produced by any scoring layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub name: String,
    pub score: f32,
}

/// Common interface over the two lexical ranking formulas, so the query
/// planner can pick one without knowing which it picked (spec §4.3/§4.4).
pub trait Scorer: Send + Sync {
    fn score(&self, index: &LexicalIndex, query: &str) -> Vec<ScoredDoc>;
    fn name(&self) -> &'static str;
}

pub struct TfIdfScorer;

impl Scorer for TfIdfScorer {
    fn score(&self, index: &LexicalIndex, query: &str) -> Vec<ScoredDoc> {
        index
            .score_tfidf(query)
            .into_iter()
            .map(|(name, score)| ScoredDoc { name, score })
            .collect()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

pub struct Bm25Scorer {
    pub config: Bm25Config,
}

impl Bm25Scorer {
    pub fn new(config: Bm25Config) -> Self {
        Bm25Scorer { config }
    }
}

impl Scorer for Bm25Scorer {
    fn score(&self, index: &LexicalIndex, query: &str) -> Vec<ScoredDoc> {
        index
            .score_bm25(query, &self.config)
            .into_iter()
            .map(|(name, score)| ScoredDoc { name, score })
            .collect()
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Entity, KnowledgeGraph};

    #[test]
    fn both_scorers_rank_the_same_winner() {
        let mut graph = KnowledgeGraph::new();
        let mut e = Entity::new("alice", "person").unwrap();
        e.observations = vec!["senior rust engineer".to_string()];
        graph.entities.insert(e.name.clone(), e);
        let mut e2 = Entity::new("bob", "person").unwrap();
        e2.observations = vec!["plays guitar".to_string()];
        graph.entities.insert(e2.name.clone(), e2);

        let mut index = LexicalIndex::new();
        index.build_index(&graph);

        let tfidf = TfIdfScorer.score(&index, "rust engineer");
        let bm25 = Bm25Scorer::new(Bm25Config::default()).score(&index, "rust engineer");

        assert_eq!(tfidf[0].name, "alice");
        assert_eq!(bm25[0].name, "alice");
    }
}
