//! Bob Jenkins' lookup3 hash.
//!
//! lookup3 folds its input into three 32-bit accumulators, 12 bytes at a
//! time. Every block except the last is followed by `mix`; the last block
//! (full or partial, zero-padded) is followed by `finalize`. The
//! accumulators start from `0xdeadbeef + len + seed`, so inputs of different
//! lengths never share an initial state.
//!
//! [`hash_single`] is the classic `hashlittle`. [`hash_double`] is
//! `hashlittle2`: one pass over the data, two 32-bit results. With a zero
//! secondary seed its first result equals [`hash_single`] with the same
//! primary seed.
//!
//! Words are read little-endian on every host, so there is a single code
//! path and values are portable between machines.

use byteorder::{ByteOrder, LittleEndian};

/// Identifier for the hash family, for callers that store hash values
/// alongside the name of the function that produced them.
pub const ALGORITHM: &str = "jenkins-lookup3";

const INITVAL: u32 = 0xdead_beef;
const BLOCK_SIZE: usize = 12;

#[inline(always)]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);

    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

#[inline(always)]
fn finalize(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));

    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));

    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));

    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

#[inline(always)]
fn absorb(block: &[u8], a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_add(LittleEndian::read_u32(&block[0..4]));
    *b = b.wrapping_add(LittleEndian::read_u32(&block[4..8]));
    *c = c.wrapping_add(LittleEndian::read_u32(&block[8..12]));
}

/// The single pass shared by both entry points. Returns `(c, b)`.
fn lookup3(data: &[u8], seed1: u32, seed2: u32) -> (u32, u32) {
    // Length is folded in modulo 2^32.
    let init = INITVAL
        .wrapping_add(data.len() as u32)
        .wrapping_add(seed1);
    let mut a = init;
    let mut b = init;
    let mut c = init.wrapping_add(seed2);

    // Zero-length input skips the final mix.
    if data.is_empty() {
        return (c, b);
    }

    let tail_len = (data.len() - 1) % BLOCK_SIZE + 1;
    let (body, tail) = data.split_at(data.len() - tail_len);

    for block in body.chunks_exact(BLOCK_SIZE) {
        absorb(block, &mut a, &mut b, &mut c);
        mix(&mut a, &mut b, &mut c);
    }

    let mut last = [0u8; BLOCK_SIZE];
    last[..tail.len()].copy_from_slice(tail);
    absorb(&last, &mut a, &mut b, &mut c);
    finalize(&mut a, &mut b, &mut c);

    (c, b)
}

/// Compute the 32-bit lookup3 hash of a byte slice.
///
/// `seed` may be a previous hash value, which chains hashes across calls,
/// or any arbitrary salt.
#[inline]
pub fn hash_single(data: &[u8], seed: u32) -> u32 {
    lookup3(data, seed, 0).0
}

/// Compute two 32-bit lookup3 hashes of a byte slice in one pass.
///
/// Returns `(c, b)` from the final state. `seed1` seeds all three
/// accumulators and `seed2` is added to `c` only, so when `seed2` is zero
/// the first value is identical to `hash_single(data, seed1)`. The second
/// value costs nothing extra: the data is read once.
#[inline]
pub fn hash_double(data: &[u8], seed1: u32, seed2: u32) -> (u32, u32) {
    lookup3(data, seed1, seed2)
}

/// Compute the lookup3 hash of a byte slice with a zero seed.
#[inline]
pub fn hash(data: &[u8]) -> u32 {
    hash_single(data, 0)
}

/// Compute both lookup3 hashes of a byte slice with zero seeds.
#[inline]
pub fn hash_pair(data: &[u8]) -> (u32, u32) {
    hash_double(data, 0, 0)
}

/// Compute the lookup3 hash of a string's UTF-8 bytes with a zero seed.
#[inline]
pub fn hash_str(s: &str) -> u32 {
    hash(s.as_bytes())
}

/// A seeded lookup3 hasher.
///
/// Bundles the two seeds so callers that salt every hash the same way
/// don't have to thread them through by hand.
///
/// # Example
///
/// ```
/// use mphash_common::lookup3::{self, Lookup3};
///
/// let hasher = Lookup3::with_seeds(7, 11);
/// assert_eq!(hasher.hash(b"key"), lookup3::hash_single(b"key", 7));
/// assert_eq!(hasher.hash_pair(b"key"), lookup3::hash_double(b"key", 7, 11));
///
/// let (first, _second) = Lookup3::with_seed(7).hash_pair(b"key");
/// assert_eq!(first, hasher.hash(b"key"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lookup3 {
    seed1: u32,
    seed2: u32,
}

impl Lookup3 {
    /// Create a hasher with both seeds zero.
    #[inline]
    pub const fn new() -> Self {
        Self { seed1: 0, seed2: 0 }
    }

    /// Create a hasher with a primary seed.
    #[inline]
    pub const fn with_seed(seed: u32) -> Self {
        Self { seed1: seed, seed2: 0 }
    }

    /// Create a hasher with both seeds.
    #[inline]
    pub const fn with_seeds(seed1: u32, seed2: u32) -> Self {
        Self { seed1, seed2 }
    }

    /// Get the `(primary, secondary)` seeds.
    #[inline]
    pub const fn seeds(&self) -> (u32, u32) {
        (self.seed1, self.seed2)
    }

    /// Hash with the primary seed.
    #[inline]
    pub fn hash(&self, data: &[u8]) -> u32 {
        hash_single(data, self.seed1)
    }

    /// Hash with both seeds, producing two values.
    #[inline]
    pub fn hash_pair(&self, data: &[u8]) -> (u32, u32) {
        hash_double(data, self.seed1, self.seed2)
    }
}
