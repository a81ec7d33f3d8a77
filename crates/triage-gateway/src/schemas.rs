//! Wire types for the gateway API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat request body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Customer query text
    pub query: String,
    /// Session identifier for conversation context
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat response body
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Generated response text
    pub response: String,
    /// Query category (Technical, Billing, General)
    pub category: String,
    /// Query sentiment (Positive, Neutral, Negative)
    pub sentiment: String,
    /// Session identifier, unchanged from the request (or generated)
    pub session_id: String,
    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check response body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status (healthy / unhealthy)
    pub status: String,
    /// Knowledge index status (connected / disconnected)
    pub vectordb: String,
    /// Check timestamp
    pub timestamp: DateTime<Utc>,
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Detailed error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Error timestamp
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Status endpoint body
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub max_query_length: usize,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_session_id_is_optional() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"query": "What payment methods do you support?"}"#).unwrap();
        assert!(request.session_id.is_none());

        let request: ChatRequest = serde_json::from_str(
            r#"{"query": "hi", "session_id": "550e8400-e29b-41d4-a716-446655440000"}"#,
        )
        .unwrap();
        assert_eq!(
            request.session_id.as_deref(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );
    }

    #[test]
    fn test_error_response_omits_empty_detail() {
        let json = serde_json::to_string(&ErrorResponse::new("bad request")).unwrap();
        assert!(!json.contains("detail"));

        let json =
            serde_json::to_string(&ErrorResponse::with_detail("bad request", "query empty")).unwrap();
        assert!(json.contains("query empty"));
    }

    #[test]
    fn test_chat_response_serializes_labels() {
        let response = ChatResponse {
            response: "We support credit cards.".to_string(),
            category: "Billing".to_string(),
            sentiment: "Neutral".to_string(),
            session_id: "s-1".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"category\":\"Billing\""));
        assert!(json.contains("\"session_id\":\"s-1\""));
    }
}
