//! Pipeline executor.
//!
//! Walks the support graph for one invocation: classify, sentiment, route,
//! then exactly one terminal stage. Strictly sequential; each stage runs at
//! most once and no stage runs before its upstream stage has completed.

use crate::error::{EngineError, Result};
use crate::events::{EventSink, PipelineEvent};
use crate::graph::SupportGraph;
use crate::router::{route, Branch};
use crate::stage::Stage;
use crate::state::{Category, Sentiment, SessionId, TicketState};
use std::sync::Arc;
use std::time::Instant;

/// Execution phase of one invocation.
///
/// `Start` is the unique initial phase, `Done` the unique terminal phase.
/// All transitions are unconditional except `Sentimented -> Routed`, which
/// consults the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Classified,
    Sentimented,
    Routed(Branch),
    Done,
}

/// Final result of one pipeline invocation.
///
/// Both labels are always set (coerced defaults at worst) and `response`
/// is non-empty; the executor treats anything else as a defect.
#[derive(Debug, Clone)]
pub struct TriageOutcome {
    /// The response text produced by the terminal stage.
    pub response: String,
    /// The assigned query category.
    pub category: Category,
    /// The assigned query sentiment.
    pub sentiment: Sentiment,
    /// Which terminal branch ran.
    pub branch: Branch,
    /// The caller's session token, unchanged.
    pub session_id: SessionId,
    /// Number of stages executed (always 3: two classifiers + one terminal).
    pub stages_executed: u32,
    /// Total execution time in milliseconds.
    pub execution_time_ms: u64,
}

/// Executor for the support graph.
pub struct PipelineExecutor {
    graph: SupportGraph,
}

impl PipelineExecutor {
    /// Create an executor over a wired graph.
    pub fn new(graph: SupportGraph) -> Self {
        Self { graph }
    }

    /// Run one invocation of the pipeline.
    ///
    /// Never fails for a service-call problem; stages absorb those. An
    /// `Err` here means a wiring or invariant defect and should be treated
    /// as fatal by the caller.
    pub async fn execute(
        &self,
        query: impl Into<String>,
        session_id: SessionId,
        event_sink: &dyn EventSink,
    ) -> Result<TriageOutcome> {
        let start_time = Instant::now();
        let execution_id = format!("triage-exec-{}", uuid::Uuid::new_v4());
        let mut state = TicketState::new(query);
        let mut stages_executed: u32 = 0;
        let mut phase = Phase::Start;

        let _ = event_sink.send(PipelineEvent::PipelineStarted {
            execution_id: execution_id.clone(),
            session_id: session_id.to_string(),
        });

        self.run_stage(
            self.graph.classify_stage(),
            &mut state,
            &execution_id,
            &mut stages_executed,
            event_sink,
        )
        .await;
        phase = self.advance(phase, Phase::Classified);

        self.run_stage(
            self.graph.sentiment_stage(),
            &mut state,
            &execution_id,
            &mut stages_executed,
            event_sink,
        )
        .await;
        phase = self.advance(phase, Phase::Sentimented);

        // Routing is total even if a classifier stage somehow left its
        // field unset: unset coerces to the documented defaults.
        let sentiment = state.sentiment().unwrap_or(Sentiment::Neutral);
        let category = state.category().unwrap_or(Category::General);
        let branch = route(sentiment, category);

        log::info!(
            "Routing decision: sentiment={}, category={} -> {}",
            sentiment,
            category,
            branch
        );
        let _ = event_sink.send(PipelineEvent::RouteSelected {
            execution_id: execution_id.clone(),
            branch,
            sentiment: sentiment.to_string(),
            category: category.to_string(),
        });
        phase = self.advance(phase, Phase::Routed(branch));

        self.run_stage(
            self.graph.terminal_stage(branch),
            &mut state,
            &execution_id,
            &mut stages_executed,
            event_sink,
        )
        .await;

        let response = match state.response() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                return Err(EngineError::InvariantViolated(format!(
                    "terminal stage '{}' left no response",
                    self.graph.terminal_stage(branch).id()
                )))
            }
        };
        self.advance(phase, Phase::Done);

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        let _ = event_sink.send(PipelineEvent::PipelineCompleted {
            execution_id,
            stages_executed,
            execution_time_ms,
        });

        Ok(TriageOutcome {
            response,
            category,
            sentiment,
            branch,
            session_id,
            stages_executed,
            execution_time_ms,
        })
    }

    /// Run a single stage and merge its update into the state.
    async fn run_stage(
        &self,
        stage: &Arc<dyn Stage>,
        state: &mut TicketState,
        execution_id: &str,
        stages_executed: &mut u32,
        event_sink: &dyn EventSink,
    ) {
        let _ = event_sink.send(PipelineEvent::StageStarted {
            execution_id: execution_id.to_string(),
            stage_id: stage.id().to_string(),
        });

        let update = stage.run(state).await;
        *stages_executed += 1;

        let summary = summarize_update(&update);
        state.apply(update);

        let _ = event_sink.send(PipelineEvent::StageCompleted {
            execution_id: execution_id.to_string(),
            stage_id: stage.id().to_string(),
            summary,
        });
    }

    fn advance(&self, from: Phase, to: Phase) -> Phase {
        log::debug!("Pipeline phase: {:?} -> {:?}", from, to);
        to
    }
}

fn summarize_update(update: &crate::state::StateUpdate) -> Option<String> {
    if let Some(category) = update.category {
        Some(format!("category={}", category))
    } else if let Some(sentiment) = update.sentiment {
        Some(format!("sentiment={}", sentiment))
    } else {
        update
            .response
            .as_ref()
            .map(|r| format!("response ({} chars)", r.len()))
    }
}
