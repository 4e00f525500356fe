//! Error types for mphash-common.

use thiserror::Error;

/// Common error type for mphash operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not a single double-quoted C string literal.
    #[error("invalid quoting: {0:?}")]
    InvalidQuoting(String),

    /// A backslash escape that C string literals don't define.
    #[error("unexpected escape sequence: {0:?}")]
    UnexpectedEscape(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
