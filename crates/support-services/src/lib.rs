//! Support Services - external collaborator boundaries for Triage
//!
//! The pipeline consumes four black-box capabilities through narrow,
//! mockable trait boundaries:
//!
//! - [`QueryClassifier`]: query text -> category label
//! - [`SentimentAnalyzer`]: query text -> sentiment label
//! - [`KnowledgeRetriever`]: query text + optional category filter -> ranked passages
//! - [`ResponseGenerator`]: composed prompt -> natural-language text
//!
//! This crate also ships the production implementations: LLM-backed label
//! services and generation over an OpenAI-compatible chat endpoint, and an
//! in-memory vector index over an embedded knowledge base. All handles are
//! injected at construction time; there are no global client singletons.

pub mod chat;
pub mod classifier;
pub mod embedding;
pub mod error;
pub mod generator;
pub mod index;
pub mod sentiment;
pub mod traits;

pub use chat::{ChatCompletionClient, ChatConfig};
pub use classifier::LlmClassifier;
pub use embedding::{EmbeddingClient, EmbeddingConfig};
pub use error::{Result, ServiceError};
pub use generator::LlmGenerator;
pub use index::{IndexRetriever, KnowledgeBase, KnowledgeDocument, RetrievalConfig, VectorIndex};
pub use sentiment::LlmSentimentAnalyzer;
pub use traits::{KnowledgeRetriever, Passage, QueryClassifier, ResponseGenerator, SentimentAnalyzer};
