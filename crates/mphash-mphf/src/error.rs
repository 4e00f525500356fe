//! Error types for perfect hash generation.

use thiserror::Error;

/// Errors that can occur when building or loading a perfect hash function.
#[derive(Debug, Error)]
pub enum Error {
    /// The same key appears twice in the key set.
    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    /// Every salt tried produced a cyclic hypergraph.
    #[error("no acyclic hypergraph found for {keys} keys after {attempts} attempts")]
    TooManyAttempts { attempts: usize, keys: usize },

    /// Stored function data is inconsistent.
    #[error("corrupt perfect hash function: {0}")]
    Corrupt(String),
}

/// Result type for perfect hash operations.
pub type Result<T> = std::result::Result<T, Error>;
