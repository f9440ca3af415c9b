//! The four retrieval models, behind one ranked-search contract.
//!
//! Each model captures an immutable snapshot of whatever statistics it
//! needs (term and document frequencies, document lengths, collection
//! probabilities) at construction time and is read-only afterwards; after
//! the index or corpus changes, the caller constructs a fresh model.

pub mod bm25;
pub mod boolean;
pub mod language;
pub mod vector;

pub use bm25::{Bm25Params, ProbabilisticModel};
pub use boolean::BooleanModel;
pub use language::{LanguageModel, LmParams};
pub use vector::VectorSpaceModel;

use crate::DocId;
use std::cmp::Ordering;

/// A ranked hit: document id and model score.
pub type ScoredDoc = (DocId, f64);

/// Ranked free-text search shared by every retrieval model.
pub trait RankingModel {
    fn name(&self) -> &'static str;

    /// Rank documents for a query, descending by score with ties broken by
    /// ascending document id, truncated to `top_k`. A query that normalizes
    /// to no terms yields an empty result, never an error.
    fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc>;

    /// The ranked document ids alone.
    fn ranked_ids(&self, query: &str, top_k: usize) -> Vec<DocId> {
        self.search(query, top_k).into_iter().map(|(id, _)| id).collect()
    }
}

/// Descending score, ascending doc id on ties, truncated to `top_k`.
pub(crate) fn rank(mut scores: Vec<ScoredDoc>, top_k: usize) -> Vec<ScoredDoc> {
    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
    });
    scores.truncate(top_k);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_by_score_then_id() {
        let ranked = rank(vec![(3, 0.5), (1, 0.9), (2, 0.5), (4, 0.1)], 10);
        assert_eq!(ranked, vec![(1, 0.9), (2, 0.5), (3, 0.5), (4, 0.1)]);
    }

    #[test]
    fn rank_truncates_to_top_k() {
        let ranked = rank(vec![(1, 0.9), (2, 0.8), (3, 0.7)], 2);
        assert_eq!(ranked.len(), 2);
        assert!(rank(vec![(1, 0.9)], 0).is_empty());
    }
}
