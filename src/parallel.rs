//! Parallel index construction: concurrent normalization, sequential merge.
//!
//! Documents are split into contiguous batches, one scoped thread per
//! batch, each with a private [`Normalizer`] and no shared mutable state.
//! After the join barrier the normalized documents are concatenated in
//! batch order and the index is built sequentially, so the result is
//! byte-for-byte independent of the worker count.

use crate::normalize::{Language, Normalizer};
use crate::{Document, InvertedIndex, ProcessedDocument};
use anyhow::{anyhow, Result};
use std::thread;

/// Normalize `documents` across `workers` threads and build an index from
/// the combined result. A panicked worker fails the whole build; no partial
/// index is ever produced.
pub fn build_parallel(
    documents: &[Document],
    language: Language,
    workers: usize,
) -> Result<(InvertedIndex, Vec<ProcessedDocument>)> {
    let workers = workers.max(1);
    let batch_size = documents.len().div_ceil(workers).max(1);

    let processed = thread::scope(|scope| -> Result<Vec<ProcessedDocument>> {
        let handles: Vec<_> = documents
            .chunks(batch_size)
            .map(|batch| {
                scope.spawn(move || {
                    let normalizer = Normalizer::new(language);
                    batch
                        .iter()
                        .map(|doc| ProcessedDocument {
                            id: doc.id,
                            terms: normalizer.normalize(&doc.text),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut processed = Vec::with_capacity(documents.len());
        for handle in handles {
            let batch = handle.join().map_err(|_| anyhow!("normalization worker panicked"))?;
            processed.extend(batch);
        }
        Ok(processed)
    })?;

    let mut index = InvertedIndex::new();
    index.build(&processed);
    tracing::info!(docs = documents.len(), workers, "parallel index build complete");
    Ok((index, processed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(1, "le chat mange une souris"),
            Document::new(2, "le chien mange un os"),
            Document::new(3, "la souris et le chat jouent"),
            Document::new(4, "les moteurs de recherche indexent des documents"),
            Document::new(5, "la compression réduit la taille des données"),
        ]
    }

    #[test]
    fn result_is_independent_of_worker_count() {
        let docs = corpus();
        let (one, processed_one) = build_parallel(&docs, Language::French, 1).unwrap();
        let (four, processed_four) = build_parallel(&docs, Language::French, 4).unwrap();
        let (many, _) = build_parallel(&docs, Language::French, 16).unwrap();
        assert_eq!(one, four);
        assert_eq!(one, many);
        // document order survives batching
        let ids: Vec<_> = processed_four.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(processed_one.len(), processed_four.len());
    }

    #[test]
    fn matches_sequential_build() {
        let docs = corpus();
        let normalizer = Normalizer::new(Language::French);
        let processed = crate::normalize_corpus(&normalizer, &docs);
        let mut sequential = InvertedIndex::new();
        sequential.build(&processed);

        let (parallel, _) = build_parallel(&docs, Language::French, 3).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        let (index, processed) = build_parallel(&[], Language::French, 4).unwrap();
        assert!(index.is_empty());
        assert!(processed.is_empty());
    }

    #[test]
    fn more_workers_than_documents() {
        let docs = vec![Document::new(1, "le chat mange une souris")];
        let (index, processed) = build_parallel(&docs, Language::French, 8).unwrap();
        assert_eq!(processed.len(), 1);
        assert!(!index.is_empty());
    }
}
