//! Core data models shared by the ingestion and retrieval paths.

use serde::{Deserialize, Serialize};

/// A source document with its extracted text.
///
/// Identified by its filename relative to the corpus root.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// A bounded word-count slice of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Identifier of the source [`Document`].
    pub document_id: String,
    /// Position of this chunk within its document, starting at 0.
    pub chunk_index: usize,
    pub text: String,
}

/// Source metadata carried alongside every indexed chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
}

/// A chunk's text and metadata, stored at the same ordinal as its vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl IndexEntry {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            text: chunk.text.clone(),
            metadata: ChunkMetadata {
                filename: chunk.document_id.clone(),
            },
        }
    }
}

/// Ingestion state for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// SHA-256 of the raw file bytes at ingestion time.
    pub content_hash: String,
    /// Number of entries this document contributed to the store.
    pub chunk_count: usize,
}
