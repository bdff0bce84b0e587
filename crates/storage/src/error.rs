//! Storage error types.

use dbx_client::ApiError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A required setting is missing or invalid.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// A name would resolve outside the configured root path.
    #[error("path traversal outside storage root: {name}")]
    PathTraversal {
        /// The offending name.
        name: String,
    },

    /// The remote API rejected or failed the call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Metadata lacked a field the operation requires.
    #[error("metadata for {path} is missing field '{field}'")]
    MissingMetadata {
        /// Path whose metadata was incomplete.
        path: String,
        /// The absent field.
        field: &'static str,
    },

    /// A server-reported timestamp did not match the expected format.
    #[error("malformed timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// Local I/O failure while buffering content.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
