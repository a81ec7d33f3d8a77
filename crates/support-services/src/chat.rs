//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! All three LLM-backed collaborators (classification, sentiment,
//! generation) share this client; each wraps it with its own fixed
//! instruction.

use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Configuration for the chat-completion client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the LLM server
    pub base_url: String,
    /// Model name (for OpenAI-compatible APIs)
    pub model: String,
    /// Temperature for sampling
    pub temperature: f32,
    /// Optional bearer token for hosted APIs
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            api_key: None,
        }
    }
}

/// Client for `/v1/chat/completions`.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatCompletionClient {
    /// Create a client with the given configuration.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one user prompt (with an optional system prompt) and return
    /// the assistant's text.
    pub async fn complete(&self, system_prompt: Option<&str>, prompt: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(sys) = system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }
        messages.push(serde_json::json!({
            "role": "user",
            "content": prompt
        }));

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "stream": false
        });

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        log::debug!("ChatCompletionClient: sending request to {}", url);

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

        let json: serde_json::Value = http_response.json().await?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ServiceError::MalformedResponse("chat completion has no message content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_model_accessor() {
        let client = ChatCompletionClient::new(ChatConfig {
            model: "llama".to_string(),
            ..ChatConfig::default()
        });
        assert_eq!(client.model(), "llama");
    }
}
