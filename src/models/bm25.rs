//! Probabilistic retrieval with Okapi BM25.
//!
//! Term and document statistics are snapshotted from the corpus at
//! construction; posting lists are read from the index to drive the
//! accumulation, so only documents containing at least one query term
//! ever receive a score.

use crate::index::InvertedIndex;
use crate::models::{rank, RankingModel, ScoredDoc};
use crate::normalize::Normalizer;
use crate::{DocId, ProcessedDocument};
use std::collections::HashMap;

/// BM25 tuning parameters: `k1` saturates term frequency (> 0), `b` scales
/// document-length normalization (in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

pub struct ProbabilisticModel<'a> {
    index: &'a InvertedIndex,
    normalizer: &'a Normalizer,
    params: Bm25Params,
    tf: HashMap<DocId, HashMap<String, u32>>,
    doc_lengths: HashMap<DocId, usize>,
    df: HashMap<String, usize>,
    avg_doc_len: f64,
    num_docs: usize,
}

impl<'a> ProbabilisticModel<'a> {
    pub fn new(
        index: &'a InvertedIndex,
        corpus: &[ProcessedDocument],
        normalizer: &'a Normalizer,
    ) -> Self {
        Self::with_params(index, corpus, normalizer, Bm25Params::default())
    }

    pub fn with_params(
        index: &'a InvertedIndex,
        corpus: &[ProcessedDocument],
        normalizer: &'a Normalizer,
        params: Bm25Params,
    ) -> Self {
        let mut tf: HashMap<DocId, HashMap<String, u32>> = HashMap::with_capacity(corpus.len());
        let mut doc_lengths = HashMap::with_capacity(corpus.len());
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in corpus {
            doc_lengths.insert(doc.id, doc.terms.len());
            let counts = tf.entry(doc.id).or_default();
            for term in &doc.terms {
                let c = counts.entry(term.clone()).or_insert(0);
                *c += 1;
                if *c == 1 {
                    *df.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }
        let avg_doc_len = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.values().sum::<usize>() as f64 / doc_lengths.len() as f64
        };
        Self { index, normalizer, params, tf, doc_lengths, df, avg_doc_len, num_docs: corpus.len() }
    }

    /// `log10((N - df + 0.5) / (df + 0.5))`, 0 for a term in no document.
    fn idf(&self, term: &str) -> f64 {
        let df = self.df.get(term).copied().unwrap_or(0);
        if df == 0 {
            return 0.0;
        }
        let n = self.num_docs as f64;
        let df = df as f64;
        ((n - df + 0.5) / (df + 0.5)).log10()
    }

    fn term_score(&self, doc_id: DocId, term: &str) -> f64 {
        let Some(tf) = self.tf.get(&doc_id).and_then(|counts| counts.get(term)) else {
            return 0.0;
        };
        let tf = f64::from(*tf);
        let doc_len = self.doc_lengths.get(&doc_id).copied().unwrap_or(0) as f64;
        let Bm25Params { k1, b } = self.params;
        let numerator = tf * (k1 + 1.0);
        let denominator = tf + k1 * (1.0 - b + b * doc_len / self.avg_doc_len.max(1.0));
        self.idf(term) * numerator / denominator
    }

    pub(crate) fn score_terms(&self, terms: &[String]) -> Vec<ScoredDoc> {
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in terms {
            if let Some(ids) = self.index.postings_ref(term) {
                for &doc_id in ids {
                    *scores.entry(doc_id).or_insert(0.0) += self.term_score(doc_id, term);
                }
            }
        }
        scores.into_iter().collect()
    }
}

impl RankingModel for ProbabilisticModel<'_> {
    fn name(&self) -> &'static str {
        "bm25"
    }

    /// Documents sharing no term with the query never enter the
    /// accumulator; accumulated totals of exactly zero (every contribution
    /// idf-clamped away) are dropped as well. Totals can be negative on
    /// tiny corpora where a term occurs in more than half the documents,
    /// and such documents still rank.
    fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let scored: Vec<ScoredDoc> =
            self.score_terms(&terms).into_iter().filter(|&(_, s)| s != 0.0).collect();
        rank(scored, top_k)
    }
}
