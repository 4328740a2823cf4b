use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::core::config::Bm25Config;
use crate::core::error::Result;
use crate::core::types::KnowledgeGraph;
use crate::index::inverted::{IndexStats, InvertedIndex};

/// The TF-IDF and BM25 layers share one inverted index; only the scoring
/// formula differs (spec §4.3/§4.4).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LexicalIndex {
    inverted: InvertedIndex,
    #[serde(skip)]
    analyzer: AnalyzerSlot,
}

/// `Analyzer` holds trait objects and cannot be (de)serialized; it is
/// rebuilt as `Analyzer::standard_english()` on load.
struct AnalyzerSlot(Analyzer);

impl std::fmt::Debug for AnalyzerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AnalyzerSlot")
    }
}

impl Default for AnalyzerSlot {
    fn default() -> Self {
        AnalyzerSlot(Analyzer::standard_english())
    }
}

impl LexicalIndex {
    pub fn new() -> Self {
        LexicalIndex::default()
    }

    /// Rebuild the index from scratch over every entity in `graph`.
    pub fn build_index(&mut self, graph: &KnowledgeGraph) {
        self.inverted = InvertedIndex::new();
        for entity in graph.entities.values() {
            let tokens = self.analyzer.0.analyze(&entity.indexable_text());
            self.inverted.insert(&entity.name, &tokens);
        }
    }

    /// Re-index only the named entities, leaving the rest of the index
    /// untouched (spec's incremental indexer calls this per batch).
    pub fn update_index(&mut self, graph: &KnowledgeGraph, changed: &[String]) {
        for name in changed {
            match graph.entity(name) {
                Some(entity) => {
                    let tokens = self.analyzer.0.analyze(&entity.indexable_text());
                    self.inverted.insert(&entity.name, &tokens);
                }
                None => self.inverted.remove(name),
            }
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.inverted.remove(name);
    }

    pub fn stats(&self) -> IndexStats {
        self.inverted.stats()
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// `idf(t) = ln(N / df(t))`, the classic TF-IDF definition (spec §4.3).
    fn tfidf_idf(&self, term: &str) -> f32 {
        let n = self.inverted.doc_count() as f32;
        let df = self.inverted.doc_freq(term) as f32;
        if n == 0.0 || df == 0.0 {
            return 0.0;
        }
        (n / df).ln()
    }

    /// `idf(t) = ln((N - df + 0.5) / (df + 0.5) + 1)`, the Robertson-Sparck
    /// Jones BM25 variant (spec §4.4).
    fn bm25_idf(&self, term: &str) -> f32 {
        let n = self.inverted.doc_count() as f32;
        let df = self.inverted.doc_freq(term) as f32;
        if n == 0.0 {
            return 0.0;
        }
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// `score(d) = sum(tf(t,d) * idf(t))`, `tf(t,d) = count(t,d) / length(d)`,
    /// over the analyzed query terms. Zero-score entities are excluded;
    /// ties break by name ascending for determinism.
    pub fn score_tfidf(&self, query: &str) -> Vec<(String, f32)> {
        let terms = self.analyzer.0.analyze(query);
        let mut scores: HashMap<String, f32> = HashMap::new();

        for token in &terms {
            let idf = self.tfidf_idf(&token.text);
            if idf <= 0.0 {
                continue;
            }
            if let Some(postings) = self.inverted.postings(&token.text) {
                for posting in postings.iter() {
                    let doc_len = self.inverted.doc_length(&posting.doc_name).unwrap_or(1).max(1) as f32;
                    let tf = posting.term_freq as f32 / doc_len;
                    *scores.entry(posting.doc_name.clone()).or_insert(0.0) += tf * idf;
                }
            }
        }

        Self::rank(scores)
    }

    fn rank(scores: HashMap<String, f32>) -> Vec<(String, f32)> {
        let mut ranked: Vec<_> = scores.into_iter().filter(|(_, s)| *s > 0.0).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    /// BM25 scoring with the configured `k1`/`b` parameters.
    pub fn score_bm25(&self, query: &str, config: &Bm25Config) -> Vec<(String, f32)> {
        let terms = self.analyzer.0.analyze(query);
        let avg_len = self.inverted.avg_doc_length().max(1.0);
        let mut scores: HashMap<String, f32> = HashMap::new();

        for token in &terms {
            let idf = self.bm25_idf(&token.text);
            let Some(postings) = self.inverted.postings(&token.text) else { continue };
            for posting in postings.iter() {
                let doc_len = self.inverted.doc_length(&posting.doc_name).unwrap_or(0) as f32;
                let tf = posting.term_freq as f32;
                let denom = tf + config.k1 * (1.0 - config.b + config.b * doc_len / avg_len);
                let contribution = idf * (tf * (config.k1 + 1.0)) / denom.max(f32::EPSILON);
                *scores.entry(posting.doc_name.clone()).or_insert(0.0) += contribution;
            }
        }

        Self::rank(scores)
    }

    pub fn save_index(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_index(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let index = bincode::deserialize_from(BufReader::new(file))?;
        Ok(index)
    }
}
