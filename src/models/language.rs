//! Statistical language-model retrieval with Jelinek-Mercer smoothing.
//!
//! Each document is a unigram model; the query likelihood mixes the
//! document distribution with the collection distribution. Scores are
//! log10 sums, typically negative, and every document in the corpus is
//! scored and ranked regardless of whether it matches a query term.

use crate::models::{rank, RankingModel, ScoredDoc};
use crate::normalize::Normalizer;
use crate::{DocId, ProcessedDocument};
use std::collections::HashMap;

/// Floor substituted for a smoothed probability of zero, so an unseen term
/// contributes `log10(1e-10)` instead of negative infinity.
pub const PROB_FLOOR: f64 = 1e-10;

/// Jelinek-Mercer mixing weight: `lambda` scales the document model,
/// `1 - lambda` the collection model. In [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmParams {
    pub lambda: f64,
}

impl Default for LmParams {
    fn default() -> Self {
        Self { lambda: 0.5 }
    }
}

pub struct LanguageModel<'a> {
    normalizer: &'a Normalizer,
    params: LmParams,
    doc_ids: Vec<DocId>,
    tf: HashMap<DocId, HashMap<String, u32>>,
    doc_lengths: HashMap<DocId, usize>,
    collection_prob: HashMap<String, f64>,
}

impl<'a> LanguageModel<'a> {
    pub fn new(corpus: &[ProcessedDocument], normalizer: &'a Normalizer) -> Self {
        Self::with_params(corpus, normalizer, LmParams::default())
    }

    pub fn with_params(
        corpus: &[ProcessedDocument],
        normalizer: &'a Normalizer,
        params: LmParams,
    ) -> Self {
        let mut doc_ids = Vec::with_capacity(corpus.len());
        let mut tf: HashMap<DocId, HashMap<String, u32>> = HashMap::with_capacity(corpus.len());
        let mut doc_lengths = HashMap::with_capacity(corpus.len());
        let mut collection_tf: HashMap<String, u64> = HashMap::new();
        let mut collection_len: u64 = 0;
        for doc in corpus {
            doc_ids.push(doc.id);
            doc_lengths.insert(doc.id, doc.terms.len());
            let counts = tf.entry(doc.id).or_default();
            for term in &doc.terms {
                *counts.entry(term.clone()).or_insert(0) += 1;
                *collection_tf.entry(term.clone()).or_insert(0) += 1;
                collection_len += 1;
            }
        }
        let collection_prob = collection_tf
            .into_iter()
            .map(|(term, count)| (term, count as f64 / collection_len.max(1) as f64))
            .collect();
        Self { normalizer, params, doc_ids, tf, doc_lengths, collection_prob }
    }

    /// `P(t|d) = lambda * tf(t,d)/|d| + (1 - lambda) * cf(t)/|C|`. A term
    /// absent from the whole collection has collection probability 0, so
    /// the smoothed value can reach 0 and hit the floor in scoring.
    fn term_probability(&self, doc_id: DocId, term: &str) -> f64 {
        let doc_len = self.doc_lengths.get(&doc_id).copied().unwrap_or(0);
        let doc_prob = if doc_len == 0 {
            0.0
        } else {
            let tf = self
                .tf
                .get(&doc_id)
                .and_then(|counts| counts.get(term))
                .copied()
                .unwrap_or(0);
            f64::from(tf) / doc_len as f64
        };
        let collection_prob = self.collection_prob.get(term).copied().unwrap_or(0.0);
        self.params.lambda * doc_prob + (1.0 - self.params.lambda) * collection_prob
    }

    pub(crate) fn score_terms(&self, terms: &[String]) -> Vec<ScoredDoc> {
        self.doc_ids
            .iter()
            .map(|&doc_id| {
                let mut score = 0.0;
                for term in terms {
                    let prob = self.term_probability(doc_id, term);
                    if prob > 0.0 {
                        score += prob.log10();
                    } else {
                        score += PROB_FLOOR.log10();
                    }
                }
                (doc_id, score)
            })
            .collect()
    }
}

impl RankingModel for LanguageModel<'_> {
    fn name(&self) -> &'static str {
        "language-model"
    }

    /// The full candidate set is scored and ranked; log-probability scores
    /// are never filtered by positivity.
    fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        rank(self.score_terms(&terms), top_k)
    }
}
