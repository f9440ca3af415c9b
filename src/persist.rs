//! Whole-file persistence of the inverted index as structured text: a JSON
//! object mapping each term to its sorted document-id list.
//!
//! Document frequencies are never stored; [`load_index`] recomputes them
//! from posting-list length so a stale stored count can never drift from
//! the postings.

use crate::index::InvertedIndex;
use crate::DocId;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub fn save_index<P: AsRef<Path>>(index: &InvertedIndex, path: P) -> Result<()> {
    let path = path.as_ref();
    // Sorted keys and sorted id lists keep the file diffable.
    let sorted: BTreeMap<&str, Vec<DocId>> = index
        .terms()
        .map(|term| (term, index.postings(term).into_iter().collect()))
        .collect();
    let json = serde_json::to_string_pretty(&sorted)?;
    let mut f = File::create(path)
        .with_context(|| format!("creating index file {}", path.display()))?;
    f.write_all(json.as_bytes())
        .with_context(|| format!("writing index file {}", path.display()))?;
    tracing::info!(terms = sorted.len(), path = %path.display(), "index saved");
    Ok(())
}

pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let mut f = File::open(path)
        .with_context(|| format!("opening index file {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)
        .with_context(|| format!("reading index file {}", path.display()))?;
    let raw: HashMap<String, Vec<DocId>> = serde_json::from_str(&buf)
        .with_context(|| format!("parsing index file {}", path.display()))?;
    let postings = raw
        .into_iter()
        .map(|(term, ids)| (term, ids.into_iter().collect::<BTreeSet<DocId>>()))
        .collect();
    let index = InvertedIndex::from_postings(postings);
    tracing::info!(terms = index.len(), path = %path.display(), "index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessedDocument;

    fn sample_index() -> InvertedIndex {
        let corpus = vec![
            ProcessedDocument { id: 1, terms: vec!["chat".into(), "souri".into()] },
            ProcessedDocument { id: 2, terms: vec!["chien".into()] },
            ProcessedDocument { id: 3, terms: vec!["chat".into()] },
        ];
        let mut index = InvertedIndex::new();
        index.build(&corpus);
        index
    }

    #[test]
    fn round_trip_reproduces_postings_and_df() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = sample_index();
        save_index(&index, &path).unwrap();
        let loaded = load_index(&path).unwrap();
        assert_eq!(loaded, index);
        assert_eq!(loaded.doc_frequency("chat"), 2);
    }

    #[test]
    fn load_recomputes_doc_frequency_from_postings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"chat": [1, 3, 9]}"#).unwrap();
        let loaded = load_index(&path).unwrap();
        assert_eq!(loaded.doc_frequency("chat"), 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_index("/nonexistent/index.json").is_err());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(load_index(&path).is_err());
    }
}
