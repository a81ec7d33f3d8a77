//! Event types for streaming pipeline progress
//!
//! Events are sent from the executor to any consumer (log tail, WebSocket,
//! test buffer) to report per-stage progress and routing decisions.

use crate::router::Branch;
use serde::{Deserialize, Serialize};

/// Trait for sending pipeline events
///
/// This abstracts over the transport mechanism (mpsc channel, log sink,
/// test buffer), allowing the executor to be used in different contexts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: PipelineEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted during pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineEvent {
    /// An invocation started
    #[serde(rename_all = "camelCase")]
    PipelineStarted {
        execution_id: String,
        session_id: String,
    },

    /// A stage started executing
    #[serde(rename_all = "camelCase")]
    StageStarted {
        execution_id: String,
        stage_id: String,
    },

    /// A stage completed and its update was merged
    #[serde(rename_all = "camelCase")]
    StageCompleted {
        execution_id: String,
        stage_id: String,
        summary: Option<String>,
    },

    /// The router selected a terminal branch
    #[serde(rename_all = "camelCase")]
    RouteSelected {
        execution_id: String,
        branch: Branch,
        sentiment: String,
        category: String,
    },

    /// The invocation completed with a response
    #[serde(rename_all = "camelCase")]
    PipelineCompleted {
        execution_id: String,
        stages_executed: u32,
        execution_time_ms: u64,
    },
}

/// An event sink that discards all events.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: PipelineEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// An event sink that buffers events in memory. Intended for tests and
/// diagnostics.
#[derive(Default)]
pub struct BufferEventSink {
    events: std::sync::Mutex<Vec<PipelineEvent>>,
}

impl BufferEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all buffered events.
    pub fn take(&self) -> Vec<PipelineEvent> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *events)
    }
}

impl EventSink for BufferEventSink {
    fn send(&self, event: PipelineEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError::channel_closed())?
            .push(event);
        Ok(())
    }
}
