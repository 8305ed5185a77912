//! Co-located record store: vector index, entries, and ingestion state.
//!
//! A [`RecordStore`] owns the [`VectorIndex`] and the parallel sequence of
//! [`IndexEntry`] values as one unit. Every mutation goes through a method
//! that changes both halves together, so the index length always equals
//! the entry count and ordinal `i` of the index always belongs to entry
//! `i`. The per-document ingestion state lives here too, so all three are
//! persisted and reloaded as one snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::models::{Chunk, DocumentRecord, IndexEntry};

/// A chunked document waiting to be appended to the store.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub content_hash: String,
    pub chunks: Vec<Chunk>,
}

/// Index + entries + ingestion state for one embedding model.
#[derive(Debug, Clone)]
pub struct RecordStore {
    model: String,
    index: VectorIndex,
    entries: Vec<IndexEntry>,
    documents: BTreeMap<String, DocumentRecord>,
}

impl RecordStore {
    /// Create an empty store with a frozen dimension.
    pub fn new(model: &str, dims: usize) -> Result<Self> {
        Ok(Self {
            model: model.to_string(),
            index: VectorIndex::create(dims)?,
            entries: Vec::new(),
            documents: BTreeMap::new(),
        })
    }

    /// Reassemble a store from persisted parts, validating alignment.
    pub fn from_parts(
        model: String,
        index: VectorIndex,
        entries: Vec<IndexEntry>,
        documents: BTreeMap<String, DocumentRecord>,
    ) -> Result<Self> {
        if index.len() != entries.len() {
            return Err(RagError::Corrupt(format!(
                "index holds {} vectors but metadata holds {} entries",
                index.len(),
                entries.len()
            )));
        }
        let recorded: usize = documents.values().map(|d| d.chunk_count).sum();
        if recorded != entries.len() {
            return Err(RagError::Corrupt(format!(
                "ingestion state accounts for {} entries, store holds {}",
                recorded,
                entries.len()
            )));
        }
        Ok(Self {
            model,
            index,
            entries,
            documents,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dims(&self) -> usize {
        self.index.dims()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn entry(&self, ordinal: usize) -> Option<&IndexEntry> {
        self.entries.get(ordinal)
    }

    /// Ingestion state: every document incorporated so far, by filename.
    pub fn documents(&self) -> &BTreeMap<String, DocumentRecord> {
        &self.documents
    }

    pub fn contains_document(&self, filename: &str) -> bool {
        self.documents.contains_key(filename)
    }

    /// Append documents and their vectors as one paired mutation.
    ///
    /// `vectors` must hold one vector per chunk, in the order the chunks
    /// appear across `docs`. The batch is validated in full before anything
    /// is written: on error the store is unchanged.
    pub fn append(&mut self, docs: &[NewDocument], vectors: &[Vec<f32>]) -> Result<Range<usize>> {
        let total: usize = docs.iter().map(|d| d.chunks.len()).sum();
        if vectors.len() != total {
            return Err(RagError::EmbeddingCount {
                expected: total,
                actual: vectors.len(),
            });
        }
        self.index.check_dims(vectors)?;
        let mut batch = BTreeSet::new();
        for doc in docs {
            if self.documents.contains_key(&doc.filename) {
                return Err(RagError::Configuration(format!(
                    "document '{}' is already indexed",
                    doc.filename
                )));
            }
            if !batch.insert(doc.filename.as_str()) {
                return Err(RagError::Configuration(format!(
                    "document '{}' appears twice in one batch",
                    doc.filename
                )));
            }
        }

        let range = self.index.add(vectors)?;
        for doc in docs {
            self.entries
                .extend(doc.chunks.iter().map(IndexEntry::from_chunk));
            self.documents.insert(
                doc.filename.clone(),
                DocumentRecord {
                    content_hash: doc.content_hash.clone(),
                    chunk_count: doc.chunks.len(),
                },
            );
        }
        Ok(range)
    }

    /// Remove a document's entries and its ingestion record.
    ///
    /// Remaining entries keep their relative order; ordinals after the
    /// removed ones shift down. Returns the number of entries removed.
    pub fn remove_document(&mut self, filename: &str) -> usize {
        if self.documents.remove(filename).is_none() {
            return 0;
        }
        let keep: Vec<bool> = self
            .entries
            .iter()
            .map(|e| e.metadata.filename != filename)
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed > 0 {
            self.index.retain(|ordinal| keep[ordinal]);
            self.entries.retain(|e| e.metadata.filename != filename);
        }
        removed
    }
}
