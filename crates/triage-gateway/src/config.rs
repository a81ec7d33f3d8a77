//! Gateway configuration loaded from environment variables.

use std::path::PathBuf;

/// Application settings.
///
/// Every field has a development-friendly default; `from_env` overrides
/// from `TRIAGE_*` environment variables. Unparseable values fall back to
/// the default with a warning rather than aborting startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bind host for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,

    /// Base URL of the OpenAI-compatible LLM server
    pub llm_base_url: String,
    /// Chat model name
    pub llm_model: String,
    /// Sampling temperature
    pub llm_temperature: f32,
    /// Optional bearer token for hosted APIs
    pub llm_api_key: Option<String>,
    /// Embedding model name
    pub embedding_model: String,

    /// Path to the knowledge base JSON file
    pub knowledge_path: PathBuf,
    /// Passages returned per retrieval
    pub rag_top_k: usize,
    /// Minimum similarity score for a passage
    pub rag_score_threshold: f32,

    /// Maximum accepted query length in bytes
    pub max_query_length: usize,
    /// Comma-separated list of allowed CORS origins
    pub allowed_origins: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            llm_base_url: "http://localhost:8080".to_string(),
            llm_model: "gpt-4o".to_string(),
            llm_temperature: 0.0,
            llm_api_key: None,
            embedding_model: "text-embedding-3-small".to_string(),
            knowledge_path: PathBuf::from("data/knowledge_base.json"),
            rag_top_k: 3,
            rag_score_threshold: 0.2,
            max_query_length: 500,
            allowed_origins: "http://localhost:8000,http://localhost:3000".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, overriding defaults from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("TRIAGE_HOST").unwrap_or(defaults.host),
            port: env_parsed("TRIAGE_PORT").unwrap_or(defaults.port),
            llm_base_url: env_string("TRIAGE_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: env_string("TRIAGE_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_temperature: env_parsed("TRIAGE_LLM_TEMPERATURE").unwrap_or(defaults.llm_temperature),
            llm_api_key: env_string("TRIAGE_LLM_API_KEY"),
            embedding_model: env_string("TRIAGE_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            knowledge_path: env_string("TRIAGE_KNOWLEDGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.knowledge_path),
            rag_top_k: env_parsed("TRIAGE_RAG_TOP_K").unwrap_or(defaults.rag_top_k),
            rag_score_threshold: env_parsed("TRIAGE_RAG_SCORE_THRESHOLD")
                .unwrap_or(defaults.rag_score_threshold),
            max_query_length: env_parsed("TRIAGE_MAX_QUERY_LENGTH")
                .unwrap_or(defaults.max_query_length),
            allowed_origins: env_string("TRIAGE_ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins),
        }
    }

    /// The configured CORS origins, split and trimmed.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparseable value for {}: '{}'", key, raw);
            None
        }
    }
}
