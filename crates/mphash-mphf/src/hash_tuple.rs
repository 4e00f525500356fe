//! Per-key hyperedges derived from lookup3.

use mphash_common::lookup3::{hash_double, hash_single};

/// Number of vertices per hyperedge, and number of vertex partitions.
pub const ARITY: usize = 3;

/// Maps keys to one vertex in each of three equal partitions.
///
/// Partition `i` covers vertices `i * range .. (i + 1) * range`. The first
/// two hashes come from a single [`hash_double`] pass, the third from
/// [`hash_single`] with its own salt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashTuple {
    range: usize,
    salts: [u32; ARITY],
}

impl HashTuple {
    /// Create a tuple over `range` vertices per partition. `range` must be
    /// non-zero.
    pub const fn new(range: usize, salts: [u32; ARITY]) -> Self {
        Self { range, salts }
    }

    /// Vertices per partition.
    #[inline]
    pub const fn range(&self) -> usize {
        self.range
    }

    /// Total vertex count across partitions.
    #[inline]
    pub const fn vertex_count(&self) -> usize {
        self.range * ARITY
    }

    /// Total vertex count, or `None` if it does not fit in `usize`. Every
    /// vertex index of an edge is below this count, so a `Some` also
    /// bounds [`edge`](Self::edge).
    #[inline]
    pub const fn checked_vertex_count(&self) -> Option<usize> {
        self.range.checked_mul(ARITY)
    }

    /// The three lookup3 salts.
    #[inline]
    pub const fn salts(&self) -> [u32; ARITY] {
        self.salts
    }

    /// The raw 32-bit hashes of a key.
    #[inline]
    pub fn hashes(&self, key: &[u8]) -> [u32; ARITY] {
        let (h0, h1) = hash_double(key, self.salts[0], self.salts[1]);
        let h2 = hash_single(key, self.salts[2]);
        [h0, h1, h2]
    }

    /// The hyperedge of a key, along with the hashes it came from.
    #[inline]
    pub fn edge_with_hashes(&self, key: &[u8]) -> ([usize; ARITY], [u32; ARITY]) {
        let hashes = self.hashes(key);
        let mut edge = [0usize; ARITY];
        for (i, (vertex, &h)) in edge.iter_mut().zip(&hashes).enumerate() {
            *vertex = h as usize % self.range + i * self.range;
        }
        (edge, hashes)
    }

    /// The hyperedge of a key.
    #[inline]
    pub fn edge(&self, key: &[u8]) -> [usize; ARITY] {
        self.edge_with_hashes(key).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_partitions() {
        let tuple = HashTuple::new(10, [0, 1, 2]);
        let keys: [&[u8]; 4] = [b"", b"foo", b"bar", b"a longer key than twelve bytes"];
        for key in keys {
            let edge = tuple.edge(key);
            for (i, &v) in edge.iter().enumerate() {
                assert!(v >= i * 10 && v < (i + 1) * 10, "{:?}", edge);
            }
        }
    }

    #[test]
    fn test_hashes_use_salts() {
        let tuple = HashTuple::new(7, [0, 0, 1]);
        let hashes = tuple.hashes(b"Four score and seven years ago");
        assert_eq!(hashes, [0x17770551, 0xce7226e6, 0xcd628161]);

        let (edge, from_edge) = tuple.edge_with_hashes(b"Four score and seven years ago");
        assert_eq!(from_edge, hashes);
        assert_eq!(edge[0], 0x17770551 % 7);
    }

    #[test]
    fn test_checked_vertex_count() {
        assert_eq!(HashTuple::new(5, [0, 1, 2]).checked_vertex_count(), Some(15));
        let largest = usize::MAX / ARITY;
        assert_eq!(
            HashTuple::new(largest, [0, 1, 2]).checked_vertex_count(),
            Some(largest * ARITY)
        );
        assert_eq!(HashTuple::new(largest + 1, [0, 1, 2]).checked_vertex_count(), None);
    }
}
