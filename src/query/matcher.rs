use std::cmp::Ordering;
use std::collections::HashSet;

use crate::index::inverted::InvertedIndex;
use crate::index::posting::PostingList;
use crate::query::ast::BoolExpr;

/// Evaluates a boolean query AST against an inverted index, returning the
/// set of matching document names.
///
/// The index exposes no term positions (spec §4.2's operation list), so
/// phrase clauses are matched by co-occurrence of every phrase word
/// rather than strict adjacency — an approximation recorded as a design
/// decision rather than a missing feature. AND/OR over two bare terms
/// merge their posting lists directly with `PostingList`'s sorted
/// linear-merge helpers; nested boolean expressions merge the (already
/// sorted) recursive results the same way instead of falling back to
/// hashing, per §4.2's rationale for keeping postings sorted.
pub struct BooleanMatcher<'a> {
    index: &'a InvertedIndex,
}

impl<'a> BooleanMatcher<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        BooleanMatcher { index }
    }

    pub fn matching_docs(&self, expr: &BoolExpr) -> HashSet<String> {
        self.eval(expr).into_iter().collect()
    }

    fn eval(&self, expr: &BoolExpr) -> Vec<String> {
        match expr {
            BoolExpr::Term(term) => self.doc_names_for_term(term),
            BoolExpr::Phrase(words) => words
                .iter()
                .map(|w| self.doc_names_for_term(w))
                .reduce(|a, b| sorted_intersect(&a, &b))
                .unwrap_or_default(),
            BoolExpr::And(l, r) => match (l.as_ref(), r.as_ref()) {
                (BoolExpr::Term(lt), BoolExpr::Term(rt)) => {
                    match (self.index.postings(lt), self.index.postings(rt)) {
                        (Some(a), Some(b)) => PostingList::intersect_doc_names(a, b),
                        _ => Vec::new(),
                    }
                }
                _ => sorted_intersect(&self.eval(l), &self.eval(r)),
            },
            BoolExpr::Or(l, r) => match (l.as_ref(), r.as_ref()) {
                (BoolExpr::Term(lt), BoolExpr::Term(rt)) => {
                    match (self.index.postings(lt), self.index.postings(rt)) {
                        (Some(a), Some(b)) => PostingList::union_doc_names(a, b),
                        (Some(a), None) => a.iter().map(|p| p.doc_name.clone()).collect(),
                        (None, Some(b)) => b.iter().map(|p| p.doc_name.clone()).collect(),
                        (None, None) => Vec::new(),
                    }
                }
                _ => sorted_union(&self.eval(l), &self.eval(r)),
            },
            BoolExpr::Not(inner) => sorted_difference(&self.universe_sorted(), &self.eval(inner)),
        }
    }

    fn doc_names_for_term(&self, term: &str) -> Vec<String> {
        self.index.postings(term).map(|list| list.iter().map(|p| p.doc_name.clone()).collect()).unwrap_or_default()
    }

    fn universe_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.documents().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }
}

/// Sorted linear-merge intersection over names that didn't come from a
/// single posting list (nested AND/OR), mirroring
/// `PostingList::intersect_doc_names`.
fn sorted_intersect(a: &[String], b: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    result
}

fn sorted_union(a: &[String], b: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                result.push(a[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                result.push(b[j].clone());
                j += 1;
            }
            Ordering::Equal => {
                result.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

fn sorted_difference(universe: &[String], excluded: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut j = 0;
    for name in universe {
        while j < excluded.len() && excluded[j].as_str() < name.as_str() {
            j += 1;
        }
        if j >= excluded.len() || excluded[j] != *name {
            result.push(name.clone());
        }
    }
    result
}
