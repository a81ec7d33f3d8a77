//! HTTP and WebSocket handlers.
//!
//! The transport layer owns input validation (empty or over-length query)
//! and session-id minting; everything past that boundary is the pipeline,
//! which never surfaces a service failure.

use crate::schemas::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, StatusResponse};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use pipeline_engine::{EventSink, PipelineEvent, PipelineExecutor, SessionId};
use support_services::VectorIndex;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<PipelineExecutor>,
    pub index: Arc<VectorIndex>,
    pub model: String,
    pub max_query_length: usize,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/ws/chat", get(ws_chat))
        .route("/health", get(health))
        .route("/api/status", get(status))
        .with_state(state)
}

/// Event sink that mirrors pipeline progress into the debug log.
struct LogEventSink;

impl EventSink for LogEventSink {
    fn send(&self, event: PipelineEvent) -> Result<(), pipeline_engine::events::EventError> {
        log::debug!("pipeline event: {:?}", event);
        Ok(())
    }
}

/// Validate a query at the transport boundary.
fn validate_query(query: &str, max_length: usize) -> Result<(), String> {
    if query.len() > max_length {
        return Err(format!(
            "Query too long. Maximum length is {} characters.",
            max_length
        ));
    }
    if query.trim().is_empty() {
        return Err("Query cannot be empty.".to_string());
    }
    Ok(())
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(message) = validate_query(&request.query, state.max_query_length) {
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))));
    }

    let session_id = request
        .session_id
        .map(SessionId::new)
        .unwrap_or_else(SessionId::generate);

    log::info!("Processing chat request - Session: {}", session_id);

    match state
        .executor
        .execute(request.query, session_id, &LogEventSink)
        .await
    {
        Ok(outcome) => {
            log::info!(
                "Chat request processed - Session: {}, branch: {}",
                outcome.session_id,
                outcome.branch
            );
            Ok(Json(ChatResponse {
                response: outcome.response,
                category: outcome.category.to_string(),
                sentiment: outcome.sentiment.to_string(),
                session_id: outcome.session_id.to_string(),
                timestamp: Utc::now(),
            }))
        }
        Err(e) => {
            log::error!("Error processing chat request: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_detail("Internal server error", e.to_string())),
            ))
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = !state.index.is_empty();
    Json(HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        vectordb: if connected { "connected" } else { "disconnected" }.to_string(),
        timestamp: Utc::now(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.model.clone(),
        max_query_length: state.max_query_length,
        timestamp: Utc::now(),
    })
}

async fn ws_chat(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One WebSocket connection keeps one session id for all its turns.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = SessionId::generate();
    log::info!("WebSocket connection established - Session: {}", session_id);

    while let Some(Ok(message)) = socket.recv().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let payload = process_turn(&state, &session_id, &text).await;
        if socket.send(Message::Text(payload.to_string())).await.is_err() {
            break;
        }
    }

    log::info!("WebSocket disconnected - Session: {}", session_id);
}

async fn process_turn(
    state: &AppState,
    session_id: &SessionId,
    query: &str,
) -> serde_json::Value {
    if let Err(message) = validate_query(query, state.max_query_length) {
        return serde_json::json!({ "error": message });
    }

    match state
        .executor
        .execute(query, session_id.clone(), &LogEventSink)
        .await
    {
        Ok(outcome) => serde_json::json!({
            "response": outcome.response,
            "category": outcome.category.to_string(),
            "sentiment": outcome.sentiment.to_string(),
            "session_id": outcome.session_id.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        }),
        Err(e) => {
            log::error!("Error processing WebSocket message: {}", e);
            serde_json::json!({ "error": format!("Error processing your request: {}", e) })
        }
    }
}
