//! Error types for recap-passage.
//!
//! This module defines the error types returned by extraction operations.
//! Most "not found" situations are not errors: a missing container falls back
//! to the document body and an anchor outside its container yields empty text.

/// Error type for extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A boundary path was missing, malformed, or did not end at the root.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// A configured selector could not be parsed as CSS.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Persisted settings could not be read.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
