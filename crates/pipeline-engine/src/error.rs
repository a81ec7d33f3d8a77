//! Error types for the pipeline engine

use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the pipeline engine.
///
/// Service-call failures never appear here: stages absorb them and return
/// fallback updates. Every variant below marks a wiring or invariant defect
/// that should be impossible once a graph has been built.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A graph slot was left empty at build time
    #[error("Incomplete graph: missing {0} stage")]
    IncompleteGraph(&'static str),

    /// Pipeline execution failed
    #[error("Pipeline execution failed: {0}")]
    ExecutionFailed(String),

    /// A completed invocation violated a terminal invariant
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}
