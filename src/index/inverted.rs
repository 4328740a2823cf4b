use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::index::posting::PostingList;

/// Per-document term-frequency view, used both for the TF-IDF `tf(t,d)`
/// computation and for BM25's `|d|` (spec §3 `DocumentVector`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentVector {
    pub name: String,
    pub terms: HashMap<String, u32>,
    pub length: u32,
}

/// Term -> posting list, plus per-document length bookkeeping shared by
/// the TF-IDF and BM25 scorers (spec §4.2).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
    documents: HashMap<String, DocumentVector>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    pub doc_count: usize,
    pub term_count: usize,
    pub total_tokens: u64,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Index (or re-index) `doc_name` with the given already-analyzed
    /// tokens (stopwords must already be removed by the caller's
    /// analyzer). Replaces any prior entry for the same document.
    pub fn insert(&mut self, doc_name: &str, tokens: &[Token]) {
        self.remove(doc_name);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token.text.clone()).or_insert(0) += 1;
        }

        for (term, freq) in &counts {
            self.postings.entry(term.clone()).or_insert_with(PostingList::new).upsert(doc_name, *freq);
        }

        self.documents.insert(
            doc_name.to_string(),
            DocumentVector {
                name: doc_name.to_string(),
                length: counts.values().sum(),
                terms: counts,
            },
        );
    }

    /// Remove `doc_name`, decrementing document frequencies and deleting
    /// any posting list left empty.
    pub fn remove(&mut self, doc_name: &str) {
        if let Some(doc) = self.documents.remove(doc_name) {
            for term in doc.terms.keys() {
                if let Some(list) = self.postings.get_mut(term) {
                    list.remove(doc_name);
                    if list.is_empty() {
                        self.postings.remove(term);
                    }
                }
            }
        }
    }

    pub fn terms_for(&self, doc_name: &str) -> Option<&HashMap<String, u32>> {
        self.documents.get(doc_name).map(|d| &d.terms)
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn doc_length(&self, doc_name: &str) -> Option<u32> {
        self.documents.get(doc_name).map(|d| d.length)
    }

    pub fn document(&self, doc_name: &str) -> Option<&DocumentVector> {
        self.documents.get(doc_name)
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentVector> {
        self.documents.values()
    }

    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn doc_freq(&self, term: &str) -> u32 {
        self.postings.get(term).map(|p| p.doc_freq()).unwrap_or(0)
    }

    pub fn terms(&self) -> impl Iterator<Item = &String> {
        self.postings.keys()
    }

    pub fn avg_doc_length(&self) -> f32 {
        if self.documents.is_empty() {
            return 0.0;
        }
        let total: u64 = self.documents.values().map(|d| d.length as u64).sum();
        total as f32 / self.documents.len() as f32
    }

    pub fn size(&self) -> usize {
        self.postings.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.documents.len(),
            term_count: self.postings.len(),
            total_tokens: self.documents.values().map(|d| d.length as u64).sum(),
        }
    }

    pub fn has_doc(&self, doc_name: &str) -> bool {
        self.documents.contains_key(doc_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn tok(texts: &[&str]) -> Vec<Token> {
        texts.iter().enumerate().map(|(i, t)| Token::new(t.to_string(), i as u32)).collect()
    }

    #[test]
    fn insert_and_remove_are_consistent() {
        let mut idx = InvertedIndex::new();
        idx.insert("alice", &tok(&["engineer", "at", "techcorp"]));
        idx.insert("bob", &tok(&["manager", "at", "techcorp"]));

        assert_eq!(idx.doc_freq("techcorp"), 2);
        assert_eq!(idx.doc_length("alice"), Some(3));

        idx.remove("alice");
        assert_eq!(idx.doc_freq("techcorp"), 1);
        assert!(idx.terms_for("alice").is_none());
        assert!(idx.postings("engineer").is_none());
    }

    #[test]
    fn repeated_terms_increment_frequency() {
        let mut idx = InvertedIndex::new();
        idx.insert("doc", &tok(&["a", "a", "b"]));
        let posting = idx.postings("a").unwrap().get("doc").unwrap();
        assert_eq!(posting.term_freq, 2);
    }
}
