//! Embedder trait and vector utilities.
//!
//! Defines the [`Embedder`] trait that all embedding backends implement,
//! dimension discovery via a sample string, plus pure helpers for vector
//! serialization and L2 distance.
//!
//! Concrete embedders (hash, OpenAI, Ollama, fastembed) live in the
//! `lectern` app crate.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Sample text embedded once to discover a model's output dimension.
pub const DIMENSION_SAMPLE: &str = "test";

/// A batched text embedder.
///
/// Implementations must return exactly one vector per input text, in input
/// order, and must be deterministic for a fixed model version. All vectors
/// produced by one embedder must share a dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"all-minilm-l6-v2"`).
    fn model_name(&self) -> &str;

    /// Embed a batch of texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embed a single text.
///
/// Convenience wrapper around [`Embedder::embed`] with a one-item batch,
/// used for query embedding.
pub async fn embed_one(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let results = embedder.embed(&[text.to_string()]).await?;
    results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Empty embedding response"))
}

/// Discover the embedding dimension by embedding [`DIMENSION_SAMPLE`].
pub async fn discover_dims(embedder: &dyn Embedder) -> Result<usize> {
    let sample = embed_one(embedder, DIMENSION_SAMPLE).await?;
    if sample.is_empty() {
        anyhow::bail!(
            "Embedder '{}' returned an empty sample vector",
            embedder.model_name()
        );
    }
    Ok(sample.len())
}

/// Encode a float vector as little-endian f32 bytes.
///
/// # Example
///
/// ```rust
/// use lectern_core::embedding::{vec_to_blob, blob_to_vec};
///
/// let v = vec![1.0f32, -2.5, 3.125];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), 12); // 3 × 4 bytes
/// assert_eq!(blob_to_vec(&blob), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode little-endian f32 bytes back into a float vector.
///
/// Trailing bytes that do not form a whole `f32` are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean (L2) distance between two vectors of equal length.
///
/// ```text
/// d(a, b) = sqrt( Σ (aᵢ - bᵢ)² )
/// ```
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    l2_distance_squared(a, b).sqrt()
}
