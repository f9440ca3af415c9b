//! Posting-list compression: gap (delta) encoding of sorted id lists and
//! base-128 varint byte packing, plus a compressed whole-index artifact.
//!
//! Decoding is strict: a malformed gap or varint stream is a hard error,
//! never a guess (a zero gap cannot arise from strictly increasing ids, and
//! a truncated varint has no defined value).

use crate::index::InvertedIndex;
use crate::DocId;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Gap-encode a sorted list of unique ids: first id verbatim, then each
/// difference to its predecessor. Empty in, empty out.
pub fn encode_gaps(sorted_ids: &[DocId]) -> Vec<DocId> {
    let mut gaps = Vec::with_capacity(sorted_ids.len());
    let mut prev = 0;
    for (i, &id) in sorted_ids.iter().enumerate() {
        if i == 0 {
            gaps.push(id);
        } else {
            gaps.push(id - prev);
        }
        prev = id;
    }
    gaps
}

/// Invert [`encode_gaps`] by cumulative sum.
pub fn decode_gaps(gaps: &[DocId]) -> Result<Vec<DocId>> {
    let mut ids = Vec::with_capacity(gaps.len());
    let mut current: DocId = 0;
    for (i, &gap) in gaps.iter().enumerate() {
        if i == 0 {
            current = gap;
        } else {
            if gap == 0 {
                bail!("malformed gap stream: zero gap at position {i}");
            }
            current = current
                .checked_add(gap)
                .with_context(|| format!("malformed gap stream: overflow at position {i}"))?;
        }
        ids.push(current);
    }
    Ok(ids)
}

/// Append the base-128 varint encoding of `value`: 7 data bits per byte,
/// high bit set on every byte except the last.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Decode one varint from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if shift >= 64 {
            bail!("malformed varint: too many continuation bytes");
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    bail!("malformed varint: input ended inside an encoded value");
}

fn encode_block(values: &[DocId]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len());
    for &v in values {
        encode_varint(u64::from(v), &mut out);
    }
    out
}

fn decode_block(mut bytes: &[u8]) -> Result<Vec<DocId>> {
    let mut values = Vec::new();
    while !bytes.is_empty() {
        let (value, used) = decode_varint(bytes)?;
        let value = DocId::try_from(value).context("malformed varint: doc id out of range")?;
        values.push(value);
        bytes = &bytes[used..];
    }
    Ok(values)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionMethod {
    #[default]
    Gap,
    None,
}

/// An index with every posting list stored as varint-packed bytes,
/// gap-encoded or verbatim depending on the method. The on-disk form is a
/// bincode blob; the format is internal and only guarantees that decoding
/// exactly inverts encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressedIndex {
    method: CompressionMethod,
    postings: HashMap<String, Vec<u8>>,
}

impl CompressedIndex {
    /// Compress every posting list of `index` (sorted first) with `method`.
    pub fn compress(index: &InvertedIndex, method: CompressionMethod) -> Self {
        let mut postings = HashMap::with_capacity(index.len());
        for term in index.terms() {
            // BTreeSet iteration is already sorted ascending.
            let ids: Vec<DocId> = index.postings(term).into_iter().collect();
            let block = match method {
                CompressionMethod::Gap => encode_block(&encode_gaps(&ids)),
                CompressionMethod::None => encode_block(&ids),
            };
            postings.insert(term.to_string(), block);
        }
        tracing::info!(terms = postings.len(), ?method, "index compressed");
        Self { method, postings }
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Decode the posting list for one term on demand. Unknown terms yield
    /// an empty list; a malformed stream is an error.
    pub fn postings(&self, term: &str) -> Result<Vec<DocId>> {
        let Some(block) = self.postings.get(term) else {
            return Ok(Vec::new());
        };
        let values = decode_block(block)?;
        match self.method {
            CompressionMethod::Gap => decode_gaps(&values),
            CompressionMethod::None => Ok(values),
        }
    }

    /// Rebuild the full uncompressed index, recomputing document
    /// frequencies from decoded posting lists.
    pub fn decompress(&self) -> Result<InvertedIndex> {
        let mut postings: HashMap<String, BTreeSet<DocId>> =
            HashMap::with_capacity(self.postings.len());
        for term in self.postings.keys() {
            let ids = self
                .postings(term)
                .with_context(|| format!("decompressing postings for term {term:?}"))?;
            postings.insert(term.clone(), ids.into_iter().collect());
        }
        Ok(InvertedIndex::from_postings(postings))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = bincode::serialize(self)?;
        let mut f = File::create(path)
            .with_context(|| format!("creating compressed index {}", path.display()))?;
        f.write_all(&bytes)
            .with_context(|| format!("writing compressed index {}", path.display()))?;
        tracing::info!(terms = self.postings.len(), path = %path.display(), "compressed index saved");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path)
            .with_context(|| format!("opening compressed index {}", path.display()))?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)
            .with_context(|| format!("reading compressed index {}", path.display()))?;
        let compressed = bincode::deserialize(&buf)
            .with_context(|| format!("parsing compressed index {}", path.display()))?;
        Ok(compressed)
    }
}
