//! mphash - Jenkins lookup3 hashing and minimal perfect hash functions.
//!
//! This crate provides a unified interface to the mphash crates.
//!
//! # Crates
//!
//! - [`mphash_common`] - lookup3 hashing (single and double output) and
//!   C string escaping
//! - [`mphash_mphf`] - Minimal perfect hash generation and perfect hash tables
//!
//! # Example
//!
//! ```
//! use mphash::prelude::*;
//!
//! assert_eq!(lookup3::hash(b"Four score and seven years ago"), 0x17770551);
//!
//! let mphf = Mphf::new(&["foo", "bar", "baz"])?;
//! assert!(mphf.hashcode("foo").unwrap() < 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use mphash_common as common;
pub use mphash_mphf as mphf;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mphash_common::escape::{escape_c_string, undump_c_string};
    pub use mphash_common::{hash_double, hash_single, lookup3, Lookup3, ALGORITHM};
    pub use mphash_mphf::{Mphf, MphfBuilder, PerfectTable};
}

// Re-export the hash entry points at the crate root
pub use mphash_common::{hash_double, hash_single};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
