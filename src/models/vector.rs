//! Vector-space retrieval: cosine similarity between L2-normalized TF-IDF
//! vectors over a vocabulary frozen at construction time.
//!
//! Adding documents after construction requires a new model instance; the
//! vocabulary ordering and all document vectors are fixed for the life of
//! the model.

use crate::index::InvertedIndex;
use crate::models::{rank, RankingModel, ScoredDoc};
use crate::normalize::Normalizer;
use crate::{DocId, ProcessedDocument};
use std::collections::HashMap;

pub struct VectorSpaceModel<'a> {
    normalizer: &'a Normalizer,
    vocabulary: Vec<String>,
    term_idx: HashMap<String, usize>,
    df: Vec<usize>,
    doc_ids: Vec<DocId>,
    doc_vectors: Vec<Vec<f64>>,
    num_docs: usize,
}

impl<'a> VectorSpaceModel<'a> {
    pub fn new(
        index: &InvertedIndex,
        corpus: &[ProcessedDocument],
        normalizer: &'a Normalizer,
    ) -> Self {
        let mut vocabulary: Vec<String> = index.terms().map(str::to_string).collect();
        vocabulary.sort();
        let term_idx: HashMap<String, usize> =
            vocabulary.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

        let num_docs = corpus.len();
        let mut df = vec![0usize; vocabulary.len()];
        let mut doc_ids = Vec::with_capacity(num_docs);
        let mut doc_counts: Vec<HashMap<usize, u32>> = Vec::with_capacity(num_docs);
        for doc in corpus {
            let mut counts: HashMap<usize, u32> = HashMap::new();
            for term in &doc.terms {
                if let Some(&i) = term_idx.get(term.as_str()) {
                    let c = counts.entry(i).or_insert(0);
                    *c += 1;
                    if *c == 1 {
                        df[i] += 1;
                    }
                }
            }
            doc_ids.push(doc.id);
            doc_counts.push(counts);
        }

        let mut model = Self {
            normalizer,
            vocabulary,
            term_idx,
            df,
            doc_ids,
            doc_vectors: Vec::new(),
            num_docs,
        };
        let doc_vectors = doc_counts.iter().map(|counts| model.tfidf_vector(counts)).collect();
        model.doc_vectors = doc_vectors;
        model
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// L2-normalized TF-IDF vector for one bag of term counts.
    /// TF is `1 + log10(count)`, IDF is `log10(N / df)`.
    fn tfidf_vector(&self, counts: &HashMap<usize, u32>) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for (&i, &count) in counts {
            let tf = 1.0 + f64::from(count).log10();
            let idf = (self.num_docs as f64 / self.df[i].max(1) as f64).log10();
            vector[i] = tf * idf;
        }
        let norm = vector.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in &mut vector {
                *w /= norm;
            }
        }
        vector
    }

    fn query_vector(&self, terms: &[String]) -> Vec<f64> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in terms {
            if let Some(&i) = self.term_idx.get(term.as_str()) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }
        self.tfidf_vector(&counts)
    }

    /// Cosine of the query against every document vector. Vectors are
    /// unit-length, so the dot product is the similarity; a query of wholly
    /// unseen terms is the zero vector and scores 0 everywhere.
    pub(crate) fn score_terms(&self, terms: &[String]) -> Vec<ScoredDoc> {
        let query = self.query_vector(terms);
        self.doc_ids
            .iter()
            .zip(&self.doc_vectors)
            .map(|(&id, vector)| {
                let dot: f64 = query.iter().zip(vector).map(|(q, d)| q * d).sum();
                (id, dot)
            })
            .collect()
    }
}

impl RankingModel for VectorSpaceModel<'_> {
    fn name(&self) -> &'static str {
        "vector-space"
    }

    fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let scored: Vec<ScoredDoc> =
            self.score_terms(&terms).into_iter().filter(|&(_, s)| s > 0.0).collect();
        rank(scored, top_k)
    }
}
