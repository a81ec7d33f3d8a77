//! Collaborator trait boundaries consumed by the pipeline stages.
//!
//! Each trait is a narrow contract over a black-box capability. The
//! executor receives implementations at construction time, which makes
//! every boundary substitutable with a deterministic fake in tests.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A retrieved supporting passage with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Passage text
    pub text: String,
    /// Source identifier (document name, URL, ...)
    pub source: String,
    /// Similarity score (0.0 to 1.0) where the retriever provides one
    pub score: Option<f32>,
}

/// Maps query text to a category label.
///
/// Returns the raw label as produced by the service; validating it
/// against the closed category set is the caller's concern.
#[async_trait]
pub trait QueryClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> Result<String>;
}

/// Maps query text to a sentiment label.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, query: &str) -> Result<String>;
}

/// Maps query text plus an optional category filter to ranked passages.
///
/// The result is finite and ordered best-first; empty is a valid answer,
/// not an error.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, category_filter: Option<&str>) -> Result<Vec<Passage>>;
}

/// Maps a composed prompt to generated text.
///
/// `instruction_template` may contain `{context}` and `{query}`
/// placeholders which the implementation substitutes before the call.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, instruction_template: &str, context: &str, query: &str)
        -> Result<String>;
}
