//! The fixed support graph topology.
//!
//! Two unconditional stages in sequence, one conditional fan-out to exactly
//! one of four terminal stages, then termination. The topology is closed:
//! every branch slot must be filled at build time, so the executor can
//! always resolve a routed branch to a stage.

use crate::error::{EngineError, Result};
use crate::router::Branch;
use crate::stage::Stage;
use std::sync::Arc;

/// The wired support graph handed to the executor.
pub struct SupportGraph {
    classify: Arc<dyn Stage>,
    sentiment: Arc<dyn Stage>,
    escalate: Arc<dyn Stage>,
    technical: Arc<dyn Stage>,
    billing: Arc<dyn Stage>,
    general: Arc<dyn Stage>,
}

impl SupportGraph {
    /// Start building a graph.
    pub fn builder() -> SupportGraphBuilder {
        SupportGraphBuilder::default()
    }

    /// The classification stage.
    pub fn classify_stage(&self) -> &Arc<dyn Stage> {
        &self.classify
    }

    /// The sentiment stage.
    pub fn sentiment_stage(&self) -> &Arc<dyn Stage> {
        &self.sentiment
    }

    /// Resolve a routed branch to its terminal stage. Total by
    /// construction: the builder refuses to produce a graph with an empty
    /// branch slot.
    pub fn terminal_stage(&self, branch: Branch) -> &Arc<dyn Stage> {
        match branch {
            Branch::Escalate => &self.escalate,
            Branch::Technical => &self.technical,
            Branch::Billing => &self.billing,
            Branch::General => &self.general,
        }
    }
}

/// Builder for [`SupportGraph`]. Fails at build time if any slot is empty.
#[derive(Default)]
pub struct SupportGraphBuilder {
    classify: Option<Arc<dyn Stage>>,
    sentiment: Option<Arc<dyn Stage>>,
    escalate: Option<Arc<dyn Stage>>,
    technical: Option<Arc<dyn Stage>>,
    billing: Option<Arc<dyn Stage>>,
    general: Option<Arc<dyn Stage>>,
}

impl SupportGraphBuilder {
    /// Set the classification stage.
    pub fn classify(mut self, stage: Arc<dyn Stage>) -> Self {
        self.classify = Some(stage);
        self
    }

    /// Set the sentiment stage.
    pub fn sentiment(mut self, stage: Arc<dyn Stage>) -> Self {
        self.sentiment = Some(stage);
        self
    }

    /// Set the escalation terminal stage.
    pub fn escalate(mut self, stage: Arc<dyn Stage>) -> Self {
        self.escalate = Some(stage);
        self
    }

    /// Set the technical-response terminal stage.
    pub fn technical(mut self, stage: Arc<dyn Stage>) -> Self {
        self.technical = Some(stage);
        self
    }

    /// Set the billing-response terminal stage.
    pub fn billing(mut self, stage: Arc<dyn Stage>) -> Self {
        self.billing = Some(stage);
        self
    }

    /// Set the general-response terminal stage.
    pub fn general(mut self, stage: Arc<dyn Stage>) -> Self {
        self.general = Some(stage);
        self
    }

    /// Finish the graph, verifying every slot is filled.
    pub fn build(self) -> Result<SupportGraph> {
        Ok(SupportGraph {
            classify: self.classify.ok_or(EngineError::IncompleteGraph("classify"))?,
            sentiment: self.sentiment.ok_or(EngineError::IncompleteGraph("sentiment"))?,
            escalate: self.escalate.ok_or(EngineError::IncompleteGraph("escalate"))?,
            technical: self.technical.ok_or(EngineError::IncompleteGraph("technical"))?,
            billing: self.billing.ok_or(EngineError::IncompleteGraph("billing"))?,
            general: self.general.ok_or(EngineError::IncompleteGraph("general"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StateUpdate, TicketState};
    use async_trait::async_trait;

    struct NoopStage(&'static str);

    #[async_trait]
    impl Stage for NoopStage {
        fn id(&self) -> &str {
            self.0
        }

        async fn run(&self, _state: &TicketState) -> StateUpdate {
            StateUpdate::none()
        }
    }

    fn stage(id: &'static str) -> Arc<dyn Stage> {
        Arc::new(NoopStage(id))
    }

    #[test]
    fn test_builder_requires_every_slot() {
        let result = SupportGraph::builder()
            .classify(stage("classify"))
            .sentiment(stage("sentiment"))
            .escalate(stage("escalate"))
            .technical(stage("technical"))
            .billing(stage("billing"))
            .build();

        assert!(matches!(result, Err(EngineError::IncompleteGraph("general"))));
    }

    #[test]
    fn test_terminal_stage_resolves_every_branch() {
        let graph = SupportGraph::builder()
            .classify(stage("classify"))
            .sentiment(stage("sentiment"))
            .escalate(stage("escalate"))
            .technical(stage("technical"))
            .billing(stage("billing"))
            .general(stage("general"))
            .build()
            .unwrap();

        assert_eq!(graph.terminal_stage(Branch::Escalate).id(), "escalate");
        assert_eq!(graph.terminal_stage(Branch::Technical).id(), "technical");
        assert_eq!(graph.terminal_stage(Branch::Billing).id(), "billing");
        assert_eq!(graph.terminal_stage(Branch::General).id(), "general");
    }
}
