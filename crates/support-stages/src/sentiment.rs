//! Sentiment stage.
//!
//! Symmetric to the classification stage: asks the sentiment service for a
//! label and coerces any failure or out-of-enum output to Neutral.

use crate::log_excerpt;
use async_trait::async_trait;
use pipeline_engine::{Sentiment, Stage, StateUpdate, TicketState};
use support_services::SentimentAnalyzer;
use std::sync::Arc;

/// Stage that assigns the query sentiment.
pub struct SentimentStage {
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl SentimentStage {
    /// Create the stage over an injected sentiment service.
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Stage for SentimentStage {
    fn id(&self) -> &str {
        "sentiment"
    }

    async fn run(&self, state: &TicketState) -> StateUpdate {
        let query = state.query();
        log::info!("Analyzing sentiment for query: {}...", log_excerpt(query));

        let sentiment = match self.analyzer.analyze(query).await {
            Ok(label) => match Sentiment::from_label(&label) {
                Some(sentiment) => sentiment,
                None => {
                    log::warn!("Invalid sentiment '{}', defaulting to 'Neutral'", label);
                    Sentiment::Neutral
                }
            },
            Err(e) => {
                log::error!("Error analyzing sentiment: {}", e);
                Sentiment::Neutral
            }
        };

        log::info!("Query sentiment analyzed as: {}", sentiment);
        StateUpdate::with_sentiment(sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_services::{Result, ServiceError};

    struct FixedAnalyzer(&'static str);

    #[async_trait]
    impl SentimentAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _query: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl SentimentAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _query: &str) -> Result<String> {
            Err(ServiceError::MalformedResponse("no content".to_string()))
        }
    }

    #[tokio::test]
    async fn test_valid_label_is_applied() {
        let stage = SentimentStage::new(Arc::new(FixedAnalyzer("Negative")));
        let update = stage.run(&TicketState::new("this is broken")).await;
        assert_eq!(update.sentiment, Some(Sentiment::Negative));
    }

    #[tokio::test]
    async fn test_unrecognized_label_coerces_to_neutral() {
        let stage = SentimentStage::new(Arc::new(FixedAnalyzer("Angry")));
        let update = stage.run(&TicketState::new("q")).await;
        assert_eq!(update.sentiment, Some(Sentiment::Neutral));
    }

    #[tokio::test]
    async fn test_service_failure_coerces_to_neutral() {
        let stage = SentimentStage::new(Arc::new(FailingAnalyzer));
        let update = stage.run(&TicketState::new("q")).await;
        assert_eq!(update.sentiment, Some(Sentiment::Neutral));
    }
}
