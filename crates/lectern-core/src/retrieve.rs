//! Query-time top-k retrieval.
//!
//! [`retrieve`] embeds a query, searches the store's index, and maps the
//! returned ordinals back to chunk texts and metadata. The caller passes
//! the store as an `Option`: `None` means no index is loaded, which is a
//! normal degraded state and yields an empty [`Retrieval`].

use anyhow::Result;
use serde::Serialize;

use crate::embedding::{embed_one, Embedder};
use crate::index::Neighbor;
use crate::models::ChunkMetadata;
use crate::store::RecordStore;

/// Default number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Ranked retrieval result, nearest first.
///
/// `chunks`, `metadata` and `distances` are parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Retrieval {
    pub chunks: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
}

impl Retrieval {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Distinct source filenames in rank order.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for m in &self.metadata {
            if !seen.contains(&m.filename.as_str()) {
                seen.push(m.filename.as_str());
            }
        }
        seen
    }
}

/// Embed `query` and return up to `k` nearest chunks from `store`.
///
/// Returns an empty result when `store` is `None`, the store is empty, the
/// query is blank, or `k` is 0. `k` larger than the store is truncated.
pub async fn retrieve(
    store: Option<&RecordStore>,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> Result<Retrieval> {
    match (store, embed_query(store, embedder, query, k).await?) {
        (Some(store), Some(query_vec)) => Ok(search_store(store, &query_vec, k)?),
        _ => Ok(Retrieval::default()),
    }
}

/// Embed `query` for a search of `store`.
///
/// Returns `None` without calling the embedder when the search would yield
/// nothing: no store, an empty store, a blank query, or `k` of 0.
pub async fn embed_query(
    store: Option<&RecordStore>,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> Result<Option<Vec<f32>>> {
    let searchable = store.is_some_and(|s| !s.is_empty());
    if !searchable || query.trim().is_empty() || k == 0 {
        return Ok(None);
    }
    Ok(Some(embed_one(embedder, query).await?))
}

/// Search `store` with an already embedded query; `k` is truncated to the
/// store size.
pub fn search_store(
    store: &RecordStore,
    query_vec: &[f32],
    k: usize,
) -> crate::error::Result<Retrieval> {
    let hits = store.index().search(query_vec, k.min(store.len()))?;
    Ok(collect_hits(store, &hits))
}

/// Map search hits to entries. Ordinals outside the store are dropped.
pub fn collect_hits(store: &RecordStore, hits: &[Neighbor]) -> Retrieval {
    let mut out = Retrieval::default();
    for hit in hits {
        if let Some(entry) = store.entry(hit.ordinal) {
            out.chunks.push(entry.text.clone());
            out.metadata.push(entry.metadata.clone());
            out.distances.push(hit.distance);
        }
    }
    out
}
