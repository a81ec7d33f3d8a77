//! Triage gateway - HTTP/WebSocket entry point for the support pipeline.
//!
//! Startup is fail-fast: the knowledge base is loaded and embedded before
//! the server binds, so an unreachable embedding endpoint or a missing
//! document file is a startup error rather than a per-request surprise.

mod config;
mod routes;
mod schemas;

use axum::http::HeaderValue;
use config::Settings;
use pipeline_engine::PipelineExecutor;
use routes::AppState;
use support_services::{
    ChatCompletionClient, ChatConfig, EmbeddingClient, EmbeddingConfig, IndexRetriever,
    KnowledgeBase, LlmClassifier, LlmGenerator, LlmSentimentAnalyzer, RetrievalConfig, VectorIndex,
};
use support_stages::build_support_graph;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let settings = Settings::from_env();

    log::info!("Starting Triage gateway...");

    let base = KnowledgeBase::load(&settings.knowledge_path)?;
    let embedder = EmbeddingClient::new(EmbeddingConfig {
        base_url: settings.llm_base_url.clone(),
        model: settings.embedding_model.clone(),
        api_key: settings.llm_api_key.clone(),
    });
    let index = Arc::new(VectorIndex::build(&base, &embedder).await?);
    log::info!("Knowledge index ready ({} documents)", index.len());

    let retriever = Arc::new(IndexRetriever::new(
        index.clone(),
        embedder,
        RetrievalConfig {
            top_k: settings.rag_top_k,
            score_threshold: settings.rag_score_threshold,
        },
    ));

    let chat = ChatCompletionClient::new(ChatConfig {
        base_url: settings.llm_base_url.clone(),
        model: settings.llm_model.clone(),
        temperature: settings.llm_temperature,
        api_key: settings.llm_api_key.clone(),
    });

    let graph = build_support_graph(
        Arc::new(LlmClassifier::new(chat.clone())),
        Arc::new(LlmSentimentAnalyzer::new(chat.clone())),
        retriever,
        Arc::new(LlmGenerator::new(chat)),
    )?;

    let state = AppState {
        executor: Arc::new(PipelineExecutor::new(graph)),
        index,
        model: settings.llm_model.clone(),
        max_query_length: settings.max_query_length,
    };

    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in settings.origins() {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => log::warn!("Ignoring invalid CORS origin: {}", origin),
        }
    }
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state).layer(cors);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Triage gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shutting down Triage gateway...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install shutdown handler: {}", e);
    }
}
