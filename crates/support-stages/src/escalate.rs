//! Escalation stage.
//!
//! Terminal stage for negative-sentiment queries. Produces a fixed
//! handoff message naming the response-time commitment and the alternate
//! contact channels. No external calls, cannot fail.

use crate::log_excerpt;
use async_trait::async_trait;
use pipeline_engine::{Stage, StateUpdate, TicketState};

const ESCALATION_MESSAGE: &str = "\
We sincerely apologize for any frustration or inconvenience you've experienced. \
Your concern is very important to us, and we want to ensure you receive the best possible support.\n\n\
A member of our customer success team will reach out to you within the next 2 hours to address \
your issue personally. In the meantime, if you need immediate assistance, please contact us at \
support@company.com or call our priority support line at 1-800-SUPPORT.\n\n\
Thank you for your patience and for bringing this to our attention.";

/// Stage that hands the query off to a human agent.
pub struct EscalateStage;

impl EscalateStage {
    /// Create the escalation stage.
    pub fn new() -> Self {
        Self
    }
}

impl Default for EscalateStage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for EscalateStage {
    fn id(&self) -> &str {
        "escalate"
    }

    async fn run(&self, state: &TicketState) -> StateUpdate {
        log::warn!(
            "Escalating negative sentiment query to human agent: {}...",
            log_excerpt(state.query())
        );
        StateUpdate::with_response(ESCALATION_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_escalation_message_is_fixed() {
        let stage = EscalateStage::new();
        let update = stage.run(&TicketState::new("this is terrible")).await;
        let response = update.response.unwrap();
        assert_eq!(response, ESCALATION_MESSAGE);
        assert!(response.contains("2 hours"));
        assert!(response.contains("support@company.com"));
    }

    #[tokio::test]
    async fn test_message_does_not_depend_on_query() {
        let stage = EscalateStage::new();
        let first = stage.run(&TicketState::new("a")).await;
        let second = stage.run(&TicketState::new("completely different")).await;
        assert_eq!(first.response, second.response);
    }
}
