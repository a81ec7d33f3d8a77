//! Classification stage.
//!
//! Asks the classification service for a category label and merges it into
//! the state. Classification failure never aborts the pipeline: a failed
//! call or an out-of-enum label coerces to General.

use crate::log_excerpt;
use async_trait::async_trait;
use pipeline_engine::{Category, Stage, StateUpdate, TicketState};
use support_services::QueryClassifier;
use std::sync::Arc;

/// Stage that assigns the query category.
pub struct ClassifyStage {
    classifier: Arc<dyn QueryClassifier>,
}

impl ClassifyStage {
    /// Create the stage over an injected classification service.
    pub fn new(classifier: Arc<dyn QueryClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Stage for ClassifyStage {
    fn id(&self) -> &str {
        "classify"
    }

    async fn run(&self, state: &TicketState) -> StateUpdate {
        let query = state.query();
        log::info!("Categorizing query: {}...", log_excerpt(query));

        let category = match self.classifier.classify(query).await {
            Ok(label) => match Category::from_label(&label) {
                Some(category) => category,
                None => {
                    log::warn!("Invalid category '{}', defaulting to 'General'", label);
                    Category::General
                }
            },
            Err(e) => {
                log::error!("Error categorizing query: {}", e);
                Category::General
            }
        };

        log::info!("Query categorized as: {}", category);
        StateUpdate::with_category(category)
    }
}
