//! Support Stages - stage implementations for the Triage pipeline
//!
//! Provides the six stages of the standard support graph:
//!
//! - [`ClassifyStage`]: query -> category, coercing invalid output to General
//! - [`SentimentStage`]: query -> sentiment, coercing invalid output to Neutral
//! - [`EscalateStage`]: fixed human-handoff message, no external calls
//! - [`RespondStage`]: retrieval + generation with a domain binding
//!   (technical / billing / general) and a fixed domain fallback
//!
//! plus [`build_support_graph`], which wires them into the fixed topology
//! from injected collaborator handles.

pub mod classify;
pub mod escalate;
pub mod respond;
pub mod sentiment;
pub mod setup;

pub use classify::ClassifyStage;
pub use escalate::EscalateStage;
pub use respond::RespondStage;
pub use sentiment::SentimentStage;
pub use setup::build_support_graph;

/// Truncate a query for log lines.
pub(crate) fn log_excerpt(query: &str) -> &str {
    let mut end = query.len().min(100);
    while !query.is_char_boundary(end) {
        end -= 1;
    }
    &query[..end]
}
