//! The inverted index: term -> posting list, with a parallel document
//! frequency table.
//!
//! Invariant: `doc_frequency(t) == postings(t).len()` for every indexed term
//! after any public operation completes. [`crate::maintain::IndexMaintainer`]
//! mutates these maps in place and upholds the same invariant.

use crate::{DocId, ProcessedDocument};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, BTreeSet<DocId>>,
    pub(crate) doc_freq: HashMap<String, usize>,
}

/// Summary statistics over an index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub num_terms: usize,
    pub avg_posting_len: f64,
    /// Most frequent terms with their document frequencies, descending.
    pub top_terms: Vec<(String, usize)>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a normalized corpus, replacing any prior state.
    ///
    /// Term multiplicity within one document adds the doc id to a term's
    /// posting list only once, and counts once toward document frequency.
    pub fn build(&mut self, corpus: &[ProcessedDocument]) {
        self.postings.clear();
        self.doc_freq.clear();
        for doc in corpus {
            let unique: BTreeSet<&str> = doc.terms.iter().map(String::as_str).collect();
            for term in unique {
                self.postings.entry(term.to_string()).or_default().insert(doc.id);
                *self.doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        tracing::info!(docs = corpus.len(), terms = self.postings.len(), "inverted index built");
    }

    /// Rebuild an index from bare posting lists, recomputing every document
    /// frequency from posting-list cardinality.
    pub(crate) fn from_postings(postings: HashMap<String, BTreeSet<DocId>>) -> Self {
        let doc_freq = postings.iter().map(|(t, ids)| (t.clone(), ids.len())).collect();
        Self { postings, doc_freq }
    }

    /// The posting list for a term; empty for unknown terms, never an error.
    pub fn postings(&self, term: &str) -> BTreeSet<DocId> {
        self.postings.get(term).cloned().unwrap_or_default()
    }

    pub(crate) fn postings_ref(&self, term: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(term)
    }

    /// Number of documents containing the term; 0 for unknown terms.
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Boolean AND: documents containing every one of `terms`. An empty term
    /// slice yields an empty set.
    pub fn search_and(&self, terms: &[String]) -> BTreeSet<DocId> {
        let Some(first) = terms.first() else {
            return BTreeSet::new();
        };
        let mut result = self.postings(first);
        for term in &terms[1..] {
            if result.is_empty() {
                break;
            }
            match self.postings.get(term.as_str()) {
                Some(ids) => result.retain(|id| ids.contains(id)),
                None => result.clear(),
            }
        }
        result
    }

    /// Every document id present in at least one posting list.
    pub fn all_doc_ids(&self) -> BTreeSet<DocId> {
        self.postings.values().flatten().copied().collect()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let num_terms = self.postings.len();
        let total: usize = self.postings.values().map(BTreeSet::len).sum();
        let avg_posting_len = if num_terms == 0 { 0.0 } else { total as f64 / num_terms as f64 };

        let mut by_freq: Vec<(String, usize)> =
            self.doc_freq.iter().map(|(t, &df)| (t.clone(), df)).collect();
        by_freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        by_freq.truncate(10);

        IndexStats { num_terms, avg_posting_len, top_terms: by_freq }
    }
}

/// Test-only invariant check shared with the maintainer tests.
#[cfg(test)]
pub(crate) fn df_matches_postings(index: &InvertedIndex) -> bool {
    index.postings.len() == index.doc_freq.len()
        && index.postings.iter().all(|(t, ids)| index.doc_frequency(t) == ids.len())
}
