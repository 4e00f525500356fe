//! Minimal perfect hash functions.

use std::collections::HashSet;

use mphash_common::escape::escape_c_string;
use tracing::{debug, trace};

use crate::graph::{self, UNASSIGNED};
use crate::hash_tuple::{HashTuple, ARITY};
use crate::rank::RankDirectory;
use crate::{Error, Result};

/// Vertices allocated per key. Peeling a random 3-hypergraph succeeds with
/// high probability above roughly 1.222 vertices per edge.
const LOAD_FACTOR: f64 = 1.23;

/// Default number of salt triples tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Vertices per partition for `n` keys.
fn partition_range(n: usize) -> usize {
    let vertices = (n as f64 * LOAD_FACTOR).ceil() as usize;
    let range = (vertices + ARITY - 1) / ARITY;
    if range <= 1 {
        2
    } else {
        range
    }
}

/// Builder for [`Mphf`].
///
/// # Example
///
/// ```
/// use mphash_mphf::MphfBuilder;
///
/// let keys = ["foo", "bar", "baz"];
/// let mphf = MphfBuilder::new().max_attempts(100).build(&keys)?;
/// assert_eq!(mphf.len(), 3);
/// # Ok::<(), mphash_mphf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MphfBuilder {
    max_attempts: usize,
    first_salt: u32,
}

impl Default for MphfBuilder {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            first_salt: 0,
        }
    }
}

impl MphfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many salt triples to try.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the first salt. Attempt `k` uses salts `first + 3k .. first + 3k + 3`.
    pub fn first_salt(mut self, salt: u32) -> Self {
        self.first_salt = salt;
        self
    }

    /// Generate a minimal perfect hash function for a set of distinct keys.
    pub fn build<K: AsRef<[u8]>>(&self, keys: &[K]) -> Result<Mphf> {
        check_distinct(keys)?;

        let n = keys.len();
        let range = partition_range(n);
        let mut salt = self.first_salt;

        for attempt in 1..=self.max_attempts {
            let tuple = HashTuple::new(
                range,
                [salt, salt.wrapping_add(1), salt.wrapping_add(2)],
            );
            salt = salt.wrapping_add(ARITY as u32);

            let edges: Vec<[usize; ARITY]> =
                keys.iter().map(|key| tuple.edge(key.as_ref())).collect();

            match graph::peel(&edges, tuple.vertex_count()) {
                Some(order) => {
                    let values = graph::assign(&edges, &order, tuple.vertex_count());
                    trace!(
                        keys = n,
                        vertices = tuple.vertex_count(),
                        attempt,
                        "built minimal perfect hash"
                    );
                    return Ok(Mphf::from_parts(n, tuple, values));
                }
                None => {
                    debug!(keys = n, attempt, "hypergraph has a cycle, retrying with new salts");
                }
            }
        }

        Err(Error::TooManyAttempts {
            attempts: self.max_attempts,
            keys: n,
        })
    }
}

fn check_distinct<K: AsRef<[u8]>>(keys: &[K]) -> Result<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.as_ref()) {
            return Err(Error::DuplicateKey {
                key: escape_c_string(key.as_ref()),
            });
        }
    }
    Ok(())
}

/// A minimal perfect hash function over a fixed key set.
///
/// Every key in the set maps to a distinct index in `0..len()`. Other
/// inputs map either to `None` or to an arbitrary index; membership can
/// only be confirmed by comparing against the stored key (see
/// [`PerfectTable`](crate::PerfectTable)).
///
/// # Example
///
/// ```
/// use mphash_mphf::Mphf;
///
/// let keys = ["foo", "bar", "baz"];
/// let mphf = Mphf::new(&keys)?;
///
/// let mut indices: Vec<_> = keys.iter().map(|k| mphf.hashcode(k).unwrap()).collect();
/// indices.sort();
/// assert_eq!(indices, [0, 1, 2]);
/// # Ok::<(), mphash_mphf::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "StoredMphf", into = "StoredMphf")
)]
pub struct Mphf {
    len: usize,
    tuple: HashTuple,
    values: Vec<u8>,
    rank: RankDirectory,
}

impl Mphf {
    /// Generate a function with default settings.
    pub fn new<K: AsRef<[u8]>>(keys: &[K]) -> Result<Self> {
        MphfBuilder::new().build(keys)
    }

    fn from_parts(len: usize, tuple: HashTuple, values: Vec<u8>) -> Self {
        let rank = RankDirectory::build(&values);
        Self {
            len,
            tuple,
            values,
            rank,
        }
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of hypergraph vertices, the range of [`phf`](Self::phf).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.values.len()
    }

    /// The lookup3 salts this function was built with.
    #[inline]
    pub fn salts(&self) -> [u32; ARITY] {
        self.tuple.salts()
    }

    fn phf_with_hashes(&self, key: &[u8]) -> (usize, [u32; ARITY]) {
        let (edge, hashes) = self.tuple.edge_with_hashes(key);
        (edge[graph::selected_slot(&self.values, &edge)], hashes)
    }

    /// Perfect (non-minimal) hash: a vertex index in `0..vertex_count()`.
    pub fn phf<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> usize {
        self.phf_with_hashes(key.as_ref()).0
    }

    /// Index of `key` in `0..len()`, or `None` if `key` is certainly not in
    /// the set. Also returns the three raw lookup3 hashes of `key`.
    pub fn hashcode_with_internal_hashes<K: AsRef<[u8]> + ?Sized>(
        &self,
        key: &K,
    ) -> (Option<usize>, [u32; ARITY]) {
        let (vertex, hashes) = self.phf_with_hashes(key.as_ref());
        if self.values[vertex] == UNASSIGNED {
            return (None, hashes);
        }
        (Some(self.rank.rank(&self.values, vertex)), hashes)
    }

    /// Index of `key` in `0..len()`, or `None` if `key` is certainly not in
    /// the set.
    pub fn hashcode<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<usize> {
        self.hashcode_with_internal_hashes(key).0
    }
}

/// Serialized form. The rank directory is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct StoredMphf {
    len: usize,
    tuple: HashTuple,
    values: Vec<u8>,
}

#[cfg(feature = "serde")]
impl From<Mphf> for StoredMphf {
    fn from(mphf: Mphf) -> Self {
        Self {
            len: mphf.len,
            tuple: mphf.tuple,
            values: mphf.values,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<StoredMphf> for Mphf {
    type Error = Error;

    fn try_from(stored: StoredMphf) -> Result<Self> {
        let vertex_count = match stored.tuple.checked_vertex_count() {
            Some(count) if count != 0 => count,
            _ => {
                return Err(Error::Corrupt(format!(
                    "invalid partition range {}",
                    stored.tuple.range()
                )))
            }
        };
        if stored.values.len() != vertex_count {
            return Err(Error::Corrupt(format!(
                "expected {} vertex values, got {}",
                vertex_count,
                stored.values.len()
            )));
        }
        if let Some(bad) = stored.values.iter().find(|&&v| v > UNASSIGNED) {
            return Err(Error::Corrupt(format!("invalid vertex value {}", bad)));
        }
        let assigned = stored.values.iter().filter(|&&v| v != UNASSIGNED).count();
        if assigned != stored.len {
            return Err(Error::Corrupt(format!(
                "{} keys but {} assigned vertices",
                stored.len, assigned
            )));
        }
        Ok(Self::from_parts(stored.len, stored.tuple, stored.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ruby-style string successor: "a" -> "b", "z" -> "aa", "az" -> "ba".
    fn succ(s: &str) -> String {
        let mut bytes = s.as_bytes().to_vec();
        for i in (0..bytes.len()).rev() {
            if bytes[i] == b'z' {
                bytes[i] = b'a';
            } else {
                bytes[i] += 1;
                return String::from_utf8(bytes).unwrap();
            }
        }
        bytes.insert(0, b'a');
        String::from_utf8(bytes).unwrap()
    }

    fn check_mphf<K: AsRef<[u8]>>(keys: &[K]) -> Mphf {
        let mphf = Mphf::new(keys).unwrap();
        assert_eq!(mphf.len(), keys.len());

        let mut seen = vec![false; keys.len()];
        for key in keys {
            let index = mphf.hashcode(key).expect("key must hash");
            assert!(index < keys.len());
            assert!(!seen[index], "collision at {}", index);
            seen[index] = true;
            assert!(mphf.phf(key) < mphf.vertex_count());
        }

        for i in 0..10 {
            let other = format!("not-a-key-{}", i);
            if let Some(index) = mphf.hashcode(&other) {
                assert!(index < keys.len());
            }
        }
        mphf
    }

    #[test]
    fn test_small_set() {
        check_mphf(&["foo", "bar", "baz"]);
    }

    #[test]
    fn test_large_set() {
        let mut keys = vec!["a".to_string()];
        for _ in 0..1000 {
            let next = succ(keys.last().unwrap());
            keys.push(next);
        }
        let mphf = check_mphf(&keys);
        assert_eq!(mphf.vertex_count(), partition_range(1001) * ARITY);
    }

    #[test]
    fn test_empty_set() {
        let keys: [&str; 0] = [];
        let mphf = check_mphf(&keys);
        assert!(mphf.is_empty());
        assert_eq!(mphf.vertex_count(), 6);
        assert_eq!(mphf.hashcode("anything"), None);
    }

    #[test]
    fn test_singleton() {
        let mphf = check_mphf(&["a"]);
        assert_eq!(mphf.hashcode("a"), Some(0));
    }

    #[test]
    fn test_binary_keys() {
        let keys: Vec<Vec<u8>> = (0u16..300).map(|i| i.to_le_bytes().to_vec()).collect();
        check_mphf(&keys);
        let short: [&[u8]; 3] = [b"", b"\0", b"\0\0"];
        check_mphf(&short);
    }

    #[test]
    fn test_duplicate_key() {
        let err = Mphf::new(&["foo", "bar", "foo"]).unwrap_err();
        match err {
            Error::DuplicateKey { key } => assert_eq!(key, "\"foo\""),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_deterministic() {
        let keys: Vec<String> = (0..200).map(|i| format!("key{}", i)).collect();
        let first = Mphf::new(&keys).unwrap();
        let second = Mphf::new(&keys).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.salts()[0] % 3, 0);
    }

    #[test]
    fn test_first_salt() {
        let keys = ["foo", "bar", "baz"];
        let mphf = MphfBuilder::new().first_salt(99).build(&keys).unwrap();
        assert!(mphf.salts()[0] >= 99);
        assert_eq!(mphf.salts()[1], mphf.salts()[0] + 1);
    }

    #[test]
    fn test_too_many_attempts() {
        let err = MphfBuilder::new().max_attempts(0).build(&["foo"]).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyAttempts {
                attempts: 0,
                keys: 1
            }
        ));
    }

    #[test]
    fn test_internal_hashes() {
        let mphf = Mphf::new(&["foo", "bar"]).unwrap();
        let salts = mphf.salts();
        let (index, hashes) = mphf.hashcode_with_internal_hashes("foo");
        assert_eq!(index, mphf.hashcode("foo"));
        let (h0, h1) = mphash_common::hash_double(b"foo", salts[0], salts[1]);
        assert_eq!(hashes, [h0, h1, mphash_common::hash_single(b"foo", salts[2])]);
    }

    #[test]
    fn test_partition_range() {
        assert_eq!(partition_range(0), 2);
        assert_eq!(partition_range(1), 2);
        assert_eq!(partition_range(3), 2);
        assert_eq!(partition_range(10), 5);
        assert_eq!(partition_range(1001), 411);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_reload() {
        let keys: Vec<String> = (0..50).map(|i| format!("k{}", i)).collect();
        let mphf = Mphf::new(&keys).unwrap();
        let json = serde_json::to_string(&mphf).unwrap();
        let loaded: Mphf = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, mphf);
        for key in &keys {
            assert_eq!(loaded.hashcode(key), mphf.hashcode(key));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_corrupt() {
        let json = r#"{"len":1,"tuple":{"range":2,"salts":[0,1,2]},"values":[3,3,3]}"#;
        assert!(serde_json::from_str::<Mphf>(json).is_err());
        let json = r#"{"len":1,"tuple":{"range":2,"salts":[0,1,2]},"values":[0,3,3,3,3,3]}"#;
        assert!(serde_json::from_str::<Mphf>(json).is_ok());
        let json = r#"{"len":1,"tuple":{"range":2,"salts":[0,1,2]},"values":[7,3,3,3,3,3]}"#;
        assert!(serde_json::from_str::<Mphf>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_overflowing_range() {
        let range = usize::MAX / ARITY + 1;
        let json = format!(
            r#"{{"len":1,"tuple":{{"range":{},"salts":[0,1,2]}},"values":[0,3]}}"#,
            range
        );
        let err = serde_json::from_str::<Mphf>(&json).unwrap_err();
        assert!(err.to_string().contains("invalid partition range"), "{}", err);

        let json = r#"{"len":0,"tuple":{"range":0,"salts":[0,1,2]},"values":[]}"#;
        assert!(serde_json::from_str::<Mphf>(json).is_err());
    }
}
