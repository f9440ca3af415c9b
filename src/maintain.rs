//! Incremental maintenance of a live [`InvertedIndex`] without a full
//! rebuild.
//!
//! The maintainer holds a mutable borrow of the index and edits its posting
//! and document-frequency maps in place; this aliasing is deliberate, so
//! that add/remove observe exactly the state the index serves. Additions
//! cost O(distinct terms in the document); removal scans every term in the
//! index, an accepted trade-off inherited from the design.

use crate::index::InvertedIndex;
use crate::DocId;

pub struct IndexMaintainer<'a> {
    index: &'a mut InvertedIndex,
}

impl<'a> IndexMaintainer<'a> {
    pub fn new(index: &'a mut InvertedIndex) -> Self {
        Self { index }
    }

    /// Insert a document's unique terms, creating posting lists as needed.
    /// Re-adding a document already present under a term is a no-op for
    /// that term, keeping document frequency equal to postings cardinality.
    pub fn add_document(&mut self, doc_id: DocId, terms: &[String]) {
        let mut added = 0usize;
        for term in terms {
            let postings = self.index.postings.entry(term.clone()).or_default();
            if postings.insert(doc_id) {
                *self.index.doc_freq.entry(term.clone()).or_insert(0) += 1;
                added += 1;
            }
        }
        tracing::debug!(doc_id, terms = added, "document added to index");
    }

    /// Remove every trace of a document. Terms whose posting list becomes
    /// empty are deleted outright. O(total terms in the index).
    pub fn remove_document(&mut self, doc_id: DocId) {
        let InvertedIndex { postings, doc_freq } = &mut *self.index;
        let mut removed = 0usize;
        postings.retain(|term, ids| {
            if ids.remove(&doc_id) {
                removed += 1;
                if let Some(df) = doc_freq.get_mut(term) {
                    *df -= 1;
                }
            }
            if ids.is_empty() {
                doc_freq.remove(term);
                false
            } else {
                true
            }
        });
        tracing::debug!(doc_id, terms = removed, "document removed from index");
    }

    /// Replace a document's terms: remove then add. Not atomic against
    /// concurrent readers; the caller serializes access.
    pub fn update_document(&mut self, doc_id: DocId, new_terms: &[String]) {
        self.remove_document(doc_id);
        self.add_document(doc_id, new_terms);
    }

    /// Union another index's postings into this one, per term, recomputing
    /// document frequency as the resulting cardinality.
    pub fn merge(&mut self, other: &InvertedIndex) {
        for (term, ids) in &other.postings {
            let postings = self.index.postings.entry(term.clone()).or_default();
            postings.extend(ids.iter().copied());
            self.index.doc_freq.insert(term.clone(), postings.len());
        }
        tracing::debug!(terms = other.postings.len(), "merged index postings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::df_matches_postings;
    use crate::ProcessedDocument;
    use std::collections::BTreeSet;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn base_index() -> InvertedIndex {
        let corpus = vec![
            ProcessedDocument { id: 1, terms: terms(&["chat", "souri"]) },
            ProcessedDocument { id: 2, terms: terms(&["chien"]) },
        ];
        let mut index = InvertedIndex::new();
        index.build(&corpus);
        index
    }

    #[test]
    fn add_creates_postings_and_df() {
        let mut index = base_index();
        let mut maintainer = IndexMaintainer::new(&mut index);
        maintainer.add_document(3, &terms(&["chat", "jou", "jou"]));
        assert_eq!(index.postings("chat"), BTreeSet::from([1, 3]));
        assert_eq!(index.postings("jou"), BTreeSet::from([3]));
        assert_eq!(index.doc_frequency("jou"), 1);
        assert!(df_matches_postings(&index));
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let mut index = base_index();
        let before = index.clone();
        let mut maintainer = IndexMaintainer::new(&mut index);
        maintainer.add_document(9, &terms(&["chat", "nouveau"]));
        maintainer.remove_document(9);
        assert_eq!(index, before);
        assert!(df_matches_postings(&index));
    }

    #[test]
    fn remove_deletes_emptied_terms() {
        let mut index = base_index();
        let mut maintainer = IndexMaintainer::new(&mut index);
        maintainer.remove_document(2);
        assert!(index.postings("chien").is_empty());
        assert_eq!(index.doc_frequency("chien"), 0);
        assert_eq!(index.len(), 2);
        assert!(df_matches_postings(&index));
    }

    #[test]
    fn remove_unknown_document_is_a_no_op() {
        let mut index = base_index();
        let before = index.clone();
        IndexMaintainer::new(&mut index).remove_document(77);
        assert_eq!(index, before);
    }

    #[test]
    fn re_adding_same_document_does_not_inflate_df() {
        let mut index = base_index();
        let mut maintainer = IndexMaintainer::new(&mut index);
        maintainer.add_document(1, &terms(&["chat"]));
        assert_eq!(index.doc_frequency("chat"), 1);
        assert!(df_matches_postings(&index));
    }

    #[test]
    fn update_replaces_terms() {
        let mut index = base_index();
        let mut maintainer = IndexMaintainer::new(&mut index);
        maintainer.update_document(1, &terms(&["lapin"]));
        assert!(index.postings("chat").is_empty());
        assert!(index.postings("souri").is_empty());
        assert_eq!(index.postings("lapin"), BTreeSet::from([1]));
        assert!(df_matches_postings(&index));
    }

    #[test]
    fn merge_unions_postings() {
        let mut index = base_index();
        let other_corpus = vec![
            ProcessedDocument { id: 3, terms: terms(&["chat", "lapin"]) },
            ProcessedDocument { id: 1, terms: terms(&["chat"]) },
        ];
        let mut other = InvertedIndex::new();
        other.build(&other_corpus);

        IndexMaintainer::new(&mut index).merge(&other);
        assert_eq!(index.postings("chat"), BTreeSet::from([1, 3]));
        assert_eq!(index.doc_frequency("chat"), 2);
        assert_eq!(index.postings("lapin"), BTreeSet::from([3]));
        assert!(df_matches_postings(&index));
    }
}
