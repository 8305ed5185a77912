//! Error taxonomy for index and store invariants.

use thiserror::Error;

/// Errors raised when an index or store invariant would be violated.
///
/// Every variant is raised *before* any mutation: an operation that fails
/// with a `RagError` leaves the index and store exactly as they were.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid setup: non-positive dimension, bad paths, bad settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A vector's length differs from the index's frozen dimension.
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The embedder returned a different number of vectors than texts.
    #[error("embedding count mismatch: expected {expected} vectors, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    /// Persisted data failed validation (truncated, wrong magic, misaligned).
    #[error("corrupt index data: {0}")]
    Corrupt(String),

    /// Writing the store to disk failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, RagError>;
