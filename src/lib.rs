//! In-memory text-search engine: an inverted index with compression and
//! incremental maintenance, queried through four interchangeable ranking
//! models (boolean, TF-IDF vector space, BM25, Jelinek-Mercer language
//! model).
//!
//! Documents flow through [`Normalizer::normalize`] into per-document term
//! sequences, which feed [`InvertedIndex::build`] (or
//! [`parallel::build_parallel`]). Ranking models take read references to the
//! index and the normalized corpus at construction time; after the corpus
//! changes, models must be rebuilt by the caller.

use serde::{Deserialize, Serialize};

pub mod compress;
pub mod index;
pub mod maintain;
pub mod models;
pub mod normalize;
pub mod parallel;
pub mod persist;

pub use index::{IndexStats, InvertedIndex};
pub use maintain::IndexMaintainer;
pub use normalize::{Language, Normalizer};

pub type DocId = u32;

/// A raw document as supplied by the corpus provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }
}

/// A document after normalization: its id and ordered term sequence,
/// possibly with repeats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub id: DocId,
    pub terms: Vec<String>,
}

/// Normalize a whole corpus sequentially with a single normalizer.
pub fn normalize_corpus(normalizer: &Normalizer, documents: &[Document]) -> Vec<ProcessedDocument> {
    documents
        .iter()
        .map(|doc| ProcessedDocument { id: doc.id, terms: normalizer.normalize(&doc.text) })
        .collect()
}
