//! Pipeline Engine - staged triage execution for Triage
//!
//! This crate provides the orchestration core that carries one customer
//! query through classification, sentiment analysis, conditional routing,
//! and exactly one terminal response stage. It supports:
//!
//! - Typed per-invocation state with set-once field semantics
//! - Object-safe async stages that absorb their own failures
//! - A pure, total routing function over a closed branch enum
//! - A fixed graph topology with a builder that rejects missing slots
//! - Event streaming through a pluggable sink
//!
//! # Architecture
//!
//! The executor owns one [`TicketState`] per invocation and walks a fixed
//! five-phase machine: `Start -> Classified -> Sentimented -> Routed ->
//! Done`. Stages never share state across invocations, so concurrent
//! invocations need no locking.
//!
//! # Example
//!
//! ```ignore
//! use pipeline_engine::{PipelineExecutor, SupportGraph, SessionId};
//! use pipeline_engine::events::NullEventSink;
//!
//! let graph = SupportGraph::builder()
//!     .classify(classify_stage)
//!     .sentiment(sentiment_stage)
//!     .escalate(escalate_stage)
//!     .technical(technical_stage)
//!     .billing(billing_stage)
//!     .general(general_stage)
//!     .build()?;
//!
//! let executor = PipelineExecutor::new(graph);
//! let outcome = executor
//!     .execute("How do I rotate my API key?", SessionId::generate(), &NullEventSink)
//!     .await?;
//! ```

pub mod error;
pub mod events;
pub mod executor;
pub mod graph;
pub mod router;
pub mod stage;
pub mod state;

// Re-export key types
pub use error::{EngineError, Result};
pub use events::{EventSink, NullEventSink, PipelineEvent};
pub use executor::{Phase, PipelineExecutor, TriageOutcome};
pub use graph::{SupportGraph, SupportGraphBuilder};
pub use router::{route, Branch};
pub use stage::Stage;
pub use state::{Category, Sentiment, SessionId, StateUpdate, TicketState};
