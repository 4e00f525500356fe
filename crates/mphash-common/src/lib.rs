//! Common utilities for mphash.
//!
//! This crate provides the pieces shared by every mphash crate:
//!
//! - [`lookup3`] - Bob Jenkins' lookup3 hash, single and double output
//! - [`escape`] - C string literal escaping, used to print and read keys

mod error;

pub mod escape;
pub mod lookup3;

pub use error::{Error, Result};
pub use lookup3::{hash_double, hash_single, Lookup3, ALGORITHM};
