//! Embedding client for OpenAI-compatible endpoints.

use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Configuration for the embedding client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding server
    pub base_url: String,
    /// Model name for embeddings
    pub model: String,
    /// Optional bearer token for hosted APIs
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
        }
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

/// Client for `/v1/embeddings`.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    /// Create a client with the given configuration.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Embed one text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| ServiceError::MalformedResponse("embedding response was empty".to_string()))
    }

    /// Embed a batch of texts, preserving input order.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "input": texts,
        });

        let url = format!("{}/v1/embeddings", self.config.base_url);
        log::debug!("EmbeddingClient: embedding {} texts via {}", texts.len(), url);

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let http_response = request.send().await?;

        if !http_response.status().is_success() {
            let status = http_response.status().as_u16();
            let body = http_response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        let parsed: EmbeddingResponse = http_response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(ServiceError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.model, "text-embedding-3-small");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"data": [{"embedding": [0.1, 0.2]}, {"embedding": [0.3, 0.4]}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }
}
