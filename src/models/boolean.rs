//! Boolean retrieval: exact set operations over posting lists, no ranking
//! among matches.

use crate::index::InvertedIndex;
use crate::models::{RankingModel, ScoredDoc};
use crate::normalize::Normalizer;
use crate::DocId;
use std::collections::BTreeSet;

pub struct BooleanModel<'a> {
    index: &'a InvertedIndex,
    normalizer: &'a Normalizer,
}

impl<'a> BooleanModel<'a> {
    pub fn new(index: &'a InvertedIndex, normalizer: &'a Normalizer) -> Self {
        Self { index, normalizer }
    }

    /// Documents containing every term.
    pub fn search_and(&self, terms: &[String]) -> BTreeSet<DocId> {
        self.index.search_and(terms)
    }

    /// Documents containing at least one term.
    pub fn search_or(&self, terms: &[String]) -> BTreeSet<DocId> {
        let mut result = BTreeSet::new();
        for term in terms {
            if let Some(ids) = self.index.postings_ref(term) {
                result.extend(ids.iter().copied());
            }
        }
        result
    }

    /// Documents not containing the term. The universe is the set of all
    /// indexed document ids.
    pub fn search_not(&self, term: &str) -> BTreeSet<DocId> {
        let mut all = self.index.all_doc_ids();
        if let Some(ids) = self.index.postings_ref(term) {
            for id in ids {
                all.remove(id);
            }
        }
        all
    }

    /// Normalize a free-text query and match with AND semantics.
    pub fn matching(&self, query: &str) -> BTreeSet<DocId> {
        let terms = self.normalizer.normalize(query);
        self.search_and(&terms)
    }
}

impl RankingModel for BooleanModel<'_> {
    fn name(&self) -> &'static str {
        "boolean"
    }

    /// Every match scores 1.0; with uniform scores the tie-break leaves
    /// results in ascending document-id order.
    fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        self.matching(query).into_iter().take(top_k).map(|id| (id, 1.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Language;
    use crate::{normalize_corpus, Document};

    fn setup() -> (InvertedIndex, Normalizer) {
        let normalizer = Normalizer::new(Language::French);
        let docs = vec![
            Document::new(1, "le chat mange une souris"),
            Document::new(2, "le chien mange un os"),
            Document::new(3, "la souris et le chat jouent"),
        ];
        let processed = normalize_corpus(&normalizer, &docs);
        let mut index = InvertedIndex::new();
        index.build(&processed);
        (index, normalizer)
    }

    #[test]
    fn and_matches_intersection() {
        let (index, normalizer) = setup();
        let model = BooleanModel::new(&index, &normalizer);
        assert_eq!(model.matching("chat souris"), BTreeSet::from([1, 3]));
        assert_eq!(model.matching("chat chien"), BTreeSet::new());
    }

    #[test]
    fn or_matches_union() {
        let (index, normalizer) = setup();
        let model = BooleanModel::new(&index, &normalizer);
        let terms = normalizer.normalize("chat chien");
        assert_eq!(model.search_or(&terms), BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn not_complements_within_indexed_docs() {
        let (index, normalizer) = setup();
        let model = BooleanModel::new(&index, &normalizer);
        let term = &normalizer.normalize("chat")[0];
        assert_eq!(model.search_not(term), BTreeSet::from([2]));
        assert_eq!(model.search_not("absent"), BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn ranked_search_scores_uniformly() {
        let (index, normalizer) = setup();
        let model = BooleanModel::new(&index, &normalizer);
        let results = model.search("chat souris", 10);
        assert_eq!(results, vec![(1, 1.0), (3, 1.0)]);
        assert_eq!(model.search("chat souris", 1), vec![(1, 1.0)]);
    }

    #[test]
    fn empty_query_yields_empty_result() {
        let (index, normalizer) = setup();
        let model = BooleanModel::new(&index, &normalizer);
        assert!(model.search("", 10).is_empty());
        assert!(model.search("le la et", 10).is_empty());
    }
}
