//! Error types for the matching engine.

use thiserror::Error;

/// Errors surfaced by index construction, queries and batch runs.
#[derive(Error, Debug)]
pub enum Error {
    /// A corpus element was not valid text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value was outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The corpus exceeded the configured build limits.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The batch was cancelled before this query started.
    #[error("batch cancelled")]
    Cancelled,
}

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
