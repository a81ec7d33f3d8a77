//! Wiring of the standard support graph.

use crate::{ClassifyStage, EscalateStage, RespondStage, SentimentStage};
use pipeline_engine::{Result, SupportGraph};
use support_services::{KnowledgeRetriever, QueryClassifier, ResponseGenerator, SentimentAnalyzer};
use std::sync::Arc;

/// Build the fixed support topology from injected collaborator handles.
///
/// Classify and sentiment run in sequence, then routing fans out to
/// escalation or one of the three retrieval+generation branches. The three
/// response stages share the same retriever and generator handles.
pub fn build_support_graph(
    classifier: Arc<dyn QueryClassifier>,
    analyzer: Arc<dyn SentimentAnalyzer>,
    retriever: Arc<dyn KnowledgeRetriever>,
    generator: Arc<dyn ResponseGenerator>,
) -> Result<SupportGraph> {
    SupportGraph::builder()
        .classify(Arc::new(ClassifyStage::new(classifier)))
        .sentiment(Arc::new(SentimentStage::new(analyzer)))
        .escalate(Arc::new(EscalateStage::new()))
        .technical(Arc::new(RespondStage::technical(
            retriever.clone(),
            generator.clone(),
        )))
        .billing(Arc::new(RespondStage::billing(
            retriever.clone(),
            generator.clone(),
        )))
        .general(Arc::new(RespondStage::general(retriever, generator)))
        .build()
}
