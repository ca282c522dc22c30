//! Error types for the Rezka episode catalog
//!
//! Every fallible operation in the crate returns [`RezkaError`].
//! Malformed individual episode items are not errors; the parser skips them.

use thiserror::Error;

/// Error type for Rezka operations
#[derive(Error, Debug)]
pub enum RezkaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not a valid JSON envelope
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Endpoint returned HTTP 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// The envelope decoded fine but reported `success: false`
    #[error("failed to get episodes: {0}")]
    RemoteRejection(String),

    /// The episodes payload could not be treated as markup at all
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Empty content or translator ID
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// Endpoint answered with a status that is neither success nor a known failure
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RezkaError {
    /// Whether the error happened before a response envelope could be interpreted.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RezkaError::Http(_)
                | RezkaError::Decode(_)
                | RezkaError::RateLimited
                | RezkaError::NotFound(_)
                | RezkaError::UnexpectedStatus(_)
        )
    }
}

/// Result type alias for Rezka operations
pub type Result<T> = std::result::Result<T, RezkaError>;
