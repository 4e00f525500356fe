//! Minimal perfect hash functions built on Jenkins' lookup3.
//!
//! Given a fixed set of distinct byte-string keys, [`Mphf`] maps each key to
//! a unique index in `0..n` using a few bits per key.
//!
//! # Construction
//!
//! Each key becomes an edge of a random 3-partite hypergraph: the three
//! vertices come from lookup3 hashes of the key under three salts (two from
//! one `hash_double` pass, one from `hash_single`). If the hypergraph peels
//! completely, every vertex gets a value in `0..3` such that the values of a
//! key's three vertices select one vertex owned by that key alone. A rank
//! directory then compresses those vertices to `0..n`. If peeling fails the
//! next salts are tried.
//!
//! # Example
//!
//! ```
//! use mphash_mphf::Mphf;
//!
//! let keys: Vec<String> = (0..100).map(|i| format!("key{}", i)).collect();
//! let mphf = Mphf::new(&keys)?;
//!
//! let mut seen = vec![false; keys.len()];
//! for key in &keys {
//!     let index = mphf.hashcode(key).unwrap();
//!     assert!(!seen[index]);
//!     seen[index] = true;
//! }
//! # Ok::<(), mphash_mphf::Error>(())
//! ```

mod error;
mod graph;
mod hash_tuple;
mod mphf;
mod rank;
mod table;

pub use error::{Error, Result};
pub use hash_tuple::{HashTuple, ARITY};
pub use mphf::{Mphf, MphfBuilder, DEFAULT_MAX_ATTEMPTS};
pub use table::PerfectTable;
