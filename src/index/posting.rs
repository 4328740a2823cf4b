use serde::{Deserialize, Serialize};

/// A single posting: a document containing a term, with how many times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_name: String,
    pub term_freq: u32,
}

/// Posting list for one term, kept sorted by `doc_name` so intersection
/// during boolean evaluation is a linear merge (spec §4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList { postings: Vec::new() }
    }

    /// Insert or update the posting for `doc_name`, keeping sort order.
    pub fn upsert(&mut self, doc_name: &str, term_freq: u32) {
        match self.postings.binary_search_by(|p| p.doc_name.as_str().cmp(doc_name)) {
            Ok(idx) => self.postings[idx].term_freq = term_freq,
            Err(idx) => self.postings.insert(
                idx,
                Posting { doc_name: doc_name.to_string(), term_freq },
            ),
        }
    }

    pub fn remove(&mut self, doc_name: &str) -> Option<Posting> {
        match self.postings.binary_search_by(|p| p.doc_name.as_str().cmp(doc_name)) {
            Ok(idx) => Some(self.postings.remove(idx)),
            Err(_) => None,
        }
    }

    pub fn get(&self, doc_name: &str) -> Option<&Posting> {
        self.postings
            .binary_search_by(|p| p.doc_name.as_str().cmp(doc_name))
            .ok()
            .map(|idx| &self.postings[idx])
    }

    pub fn doc_freq(&self) -> u32 {
        self.postings.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter()
    }

    /// Sorted intersection of two posting lists' document names (AND).
    pub fn intersect_doc_names(a: &PostingList, b: &PostingList) -> Vec<String> {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.postings.len() && j < b.postings.len() {
            match a.postings[i].doc_name.cmp(&b.postings[j].doc_name) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    result.push(a.postings[i].doc_name.clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        result
    }

    /// Sorted union of two posting lists' document names (OR).
    pub fn union_doc_names(a: &PostingList, b: &PostingList) -> Vec<String> {
        let mut result = Vec::with_capacity(a.postings.len() + b.postings.len());
        let (mut i, mut j) = (0, 0);
        while i < a.postings.len() && j < b.postings.len() {
            match a.postings[i].doc_name.cmp(&b.postings[j].doc_name) {
                std::cmp::Ordering::Less => {
                    result.push(a.postings[i].doc_name.clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    result.push(b.postings[j].doc_name.clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    result.push(a.postings[i].doc_name.clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        result.extend(a.postings[i..].iter().map(|p| p.doc_name.clone()));
        result.extend(b.postings[j..].iter().map(|p| p.doc_name.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_keeps_sorted_order() {
        let mut list = PostingList::new();
        list.upsert("charlie", 1);
        list.upsert("alice", 2);
        list.upsert("bob", 1);
        let names: Vec<_> = list.iter().map(|p| p.doc_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[test]
    fn intersect_and_union() {
        let mut a = PostingList::new();
        a.upsert("alice", 1);
        a.upsert("bob", 1);
        let mut b = PostingList::new();
        b.upsert("bob", 1);
        b.upsert("charlie", 1);

        assert_eq!(PostingList::intersect_doc_names(&a, &b), vec!["bob".to_string()]);
        assert_eq!(
            PostingList::union_doc_names(&a, &b),
            vec!["alice".to_string(), "bob".to_string(), "charlie".to_string()]
        );
    }
}
