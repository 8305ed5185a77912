//! Exact nearest-neighbor index over L2 distance.
//!
//! [`VectorIndex`] stores vectors of one frozen dimension in a flat,
//! row-major `Vec<f32>`. A vector's ordinal is its insertion position and
//! never changes while the vector is present; ordinals are the join key
//! to the parallel entry sequence in [`RecordStore`](crate::store::RecordStore).
//!
//! # Binary format
//!
//! ```text
//! offset  size        field
//! 0       4           magic  b"LIDX"
//! 4       4           format version (u32 LE)
//! 8       4           dims (u32 LE)
//! 12      8           count (u64 LE)
//! 20      count*dims*4  vectors, f32 LE, row-major
//! ```

use std::cmp::Ordering;
use std::ops::Range;

use crate::embedding::{blob_to_vec, l2_distance_squared, vec_to_blob};
use crate::error::{RagError, Result};

const MAGIC: &[u8; 4] = b"LIDX";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 20;

/// One search hit: an ordinal and its L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub ordinal: usize,
    pub distance: f32,
}

/// Flat exact L2 index with a frozen dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dims: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Create an empty index. Fails if `dims` is zero.
    pub fn create(dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(RagError::Configuration(
                "index dimension must be > 0".to_string(),
            ));
        }
        Ok(Self {
            dims,
            data: Vec::new(),
        })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dims
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The stored vector at `ordinal`.
    pub fn vector(&self, ordinal: usize) -> Option<&[f32]> {
        let start = ordinal.checked_mul(self.dims)?;
        self.data.get(start..start + self.dims)
    }

    /// Check that every vector matches the frozen dimension.
    pub fn check_dims(&self, vectors: &[Vec<f32>]) -> Result<()> {
        match vectors.iter().find(|v| v.len() != self.dims) {
            Some(bad) => Err(RagError::DimensionMismatch {
                expected: self.dims,
                actual: bad.len(),
            }),
            None => Ok(()),
        }
    }

    /// Append vectors in order and return the ordinals they were assigned.
    ///
    /// The whole batch is validated first; on a dimension mismatch nothing
    /// is appended.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<Range<usize>> {
        self.check_dims(vectors)?;
        let start = self.len();
        self.data.reserve(vectors.len() * self.dims);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(start..self.len())
    }

    /// Return the `k` nearest vectors to `query` by ascending L2 distance.
    ///
    /// Equal distances are ordered by ordinal, so the earliest-inserted
    /// vector wins a tie. Returns every vector when fewer than `k` exist,
    /// and nothing when the index is empty or `k` is zero.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dims {
            return Err(RagError::DimensionMismatch {
                expected: self.dims,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dims)
            .enumerate()
            .map(|(ordinal, v)| (l2_distance_squared(query, v), ordinal))
            .collect();

        let by_distance = |a: &(f32, usize), b: &(f32, usize)| -> Ordering {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        };

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_distance);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_distance);

        Ok(scored
            .into_iter()
            .map(|(d2, ordinal)| Neighbor {
                ordinal,
                distance: d2.sqrt(),
            })
            .collect())
    }

    /// Keep only the vectors whose ordinal satisfies `keep`, preserving
    /// their relative order. Surviving vectors are renumbered densely.
    pub fn retain<F: FnMut(usize) -> bool>(&mut self, mut keep: F) {
        let dims = self.dims;
        let mut kept = Vec::with_capacity(self.data.len());
        for (ordinal, v) in self.data.chunks_exact(dims).enumerate() {
            if keep(ordinal) {
                kept.extend_from_slice(v);
            }
        }
        self.data = kept;
    }

    /// Serialize the index (header + vectors).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.dims as u32).to_le_bytes());
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        out.extend_from_slice(&vec_to_blob(&self.data));
        out
    }

    /// Deserialize an index produced by [`encode`](Self::encode).
    ///
    /// Any structural problem (bad magic, unknown version, zero dimension,
    /// truncated or oversized payload) is [`RagError::Corrupt`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(RagError::Corrupt(format!(
                "index file too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(RagError::Corrupt("bad index magic".to_string()));
        }
        let version = read_u32(&bytes[4..8]);
        if version != FORMAT_VERSION {
            return Err(RagError::Corrupt(format!(
                "unsupported index format version {}",
                version
            )));
        }
        let dims = read_u32(&bytes[8..12]) as usize;
        if dims == 0 {
            return Err(RagError::Corrupt("index dimension is 0".to_string()));
        }
        let count = u64::from_le_bytes([
            bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
        ]);

        let payload = &bytes[HEADER_LEN..];
        let expected = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(dims))
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| RagError::Corrupt(format!("index count {} overflows", count)))?;
        if payload.len() != expected {
            return Err(RagError::Corrupt(format!(
                "index payload is {} bytes, expected {} for {} vectors of dimension {}",
                payload.len(),
                expected,
                count,
                dims
            )));
        }

        Ok(Self {
            dims,
            data: blob_to_vec(payload),
        })
    }
}

fn read_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[Vec<f32>]) -> VectorIndex {
        let mut idx = VectorIndex::create(vectors[0].len()).unwrap();
        idx.add(vectors).unwrap();
        idx
    }

    #[test]
    fn test_create_rejects_zero_dims() {
        assert!(matches!(
            VectorIndex::create(0),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn test_add_assigns_sequential_ordinals() {
        let mut idx = VectorIndex::create(2).unwrap();
        assert_eq!(idx.add(&[vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap(), 0..2);
        assert_eq!(idx.add(&[vec![2.0, 2.0]]).unwrap(), 2..3);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.vector(2), Some(&[2.0, 2.0][..]));
        assert_eq!(idx.vector(3), None);
    }

    #[test]
    fn test_dimension_mismatch_leaves_index_untouched() {
        let mut idx = VectorIndex::create(384).unwrap();
        idx.add(&[vec![0.1; 384]]).unwrap();
        let err = idx.add(&[vec![0.1; 384], vec![0.1; 256]]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 384,
                actual: 256
            }
        ));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let idx = index_with(&[vec![10.0, 0.0], vec![1.0, 0.0], vec![5.0, 0.0]]);
        let hits = idx.search(&[0.0, 0.0], 3).unwrap();
        let ordinals: Vec<usize> = hits.iter().map(|h| h.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 0]);
        assert!((hits[0].distance - 1.0).abs() < 1e-6);
        assert!((hits[2].distance - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_tie_prefers_earliest() {
        let idx = index_with(&[
            vec![3.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, -1.0],
        ]);
        let hits = idx.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].ordinal, 1);
        assert_eq!(hits[1].ordinal, 2);
    }

    #[test]
    fn test_search_k_larger_than_index_returns_all() {
        let idx = index_with(&[vec![1.0], vec![2.0]]);
        assert_eq!(idx.search(&[0.0], 10).unwrap().len(), 2);
    }

    #[test]
    fn test_search_empty_index_or_zero_k() {
        let idx = VectorIndex::create(4).unwrap();
        assert!(idx.search(&[0.0; 4], 3).unwrap().is_empty());
        let idx = index_with(&[vec![1.0]]);
        assert!(idx.search(&[0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_rejects_wrong_query_dims() {
        let idx = index_with(&[vec![1.0, 2.0]]);
        assert!(matches!(
            idx.search(&[1.0], 1),
            Err(RagError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_decode_preserves_search() {
        let idx = index_with(&[
            vec![0.25, -1.0, 3.5],
            vec![9.0, 9.0, 9.0],
            vec![-0.125, 0.0, 2.0],
        ]);
        let restored = VectorIndex::decode(&idx.encode()).unwrap();
        assert_eq!(restored, idx);
        for sample in [[0.0, 0.0, 0.0], [9.0, 8.0, 7.0], [-1.0, 1.0, 2.0]] {
            assert_eq!(idx.search(&sample, 3).unwrap(), restored.search(&sample, 3).unwrap());
        }
    }

    #[test]
    fn test_decode_rejects_corruption() {
        let idx = index_with(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let bytes = idx.encode();

        assert!(matches!(VectorIndex::decode(&bytes[..10]), Err(RagError::Corrupt(_))));
        assert!(matches!(
            VectorIndex::decode(&bytes[..bytes.len() - 1]),
            Err(RagError::Corrupt(_))
        ));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(VectorIndex::decode(&bad_magic), Err(RagError::Corrupt(_))));

        let mut bad_dims = bytes.clone();
        bad_dims[8..12].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(VectorIndex::decode(&bad_dims), Err(RagError::Corrupt(_))));
    }

    #[test]
    fn test_retain_renumbers_densely() {
        let mut idx = index_with(&[vec![0.0], vec![1.0], vec![2.0], vec![3.0]]);
        idx.retain(|ordinal| ordinal % 2 == 1);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.vector(0), Some(&[1.0][..]));
        assert_eq!(idx.vector(1), Some(&[3.0][..]));
    }
}
