//! Error types for collaborator services

use thiserror::Error;

/// Result type alias using ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors produced by external collaborator calls.
///
/// The pipeline stages absorb every variant here into a documented
/// fallback; nothing in this enum ever reaches the pipeline caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the payload was not usable
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    /// Vector index construction or lookup failure
    #[error("Index error: {0}")]
    Index(String),

    /// Knowledge base file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge base parse failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
