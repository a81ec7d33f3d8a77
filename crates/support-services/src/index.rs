//! In-memory vector index over the support knowledge base.
//!
//! The index is built eagerly at startup from a JSON document file: every
//! document is embedded up front, and any failure there is a fatal startup
//! error rather than a lazily-discovered runtime one. Lookups are cosine
//! similarity with top-k, a score threshold, and an optional category
//! metadata filter.

use crate::embedding::EmbeddingClient;
use crate::error::{Result, ServiceError};
use crate::traits::{KnowledgeRetriever, Passage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One knowledge-base document as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// Document text
    pub text: String,
    /// Document metadata
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Metadata attached to a knowledge-base document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Lowercase category label (technical, billing, general)
    #[serde(default)]
    pub category: Option<String>,
    /// Source identifier shown in retrieved passages
    #[serde(default)]
    pub source: Option<String>,
}

/// The knowledge-base document file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub documents: Vec<KnowledgeDocument>,
}

impl KnowledgeBase {
    /// Load documents from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading knowledge base from: {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let base: KnowledgeBase = serde_json::from_str(&raw)?;
        log::info!("Loaded {} documents from knowledge base", base.documents.len());
        Ok(base)
    }
}

struct IndexEntry {
    text: String,
    category: Option<String>,
    source: String,
    embedding: Vec<f32>,
}

/// An immutable cosine-similarity index over embedded documents.
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed every document and build the index.
    ///
    /// Fails if the knowledge base is empty or any embedding call fails;
    /// callers should treat that as a fatal startup error.
    pub async fn build(base: &KnowledgeBase, embedder: &EmbeddingClient) -> Result<Self> {
        if base.documents.is_empty() {
            return Err(ServiceError::Index("knowledge base has no documents".to_string()));
        }

        let texts: Vec<&str> = base.documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let entries = base
            .documents
            .iter()
            .zip(embeddings)
            .map(|(doc, embedding)| IndexEntry {
                text: doc.text.clone(),
                category: doc.metadata.category.as_ref().map(|c| c.to_lowercase()),
                source: doc
                    .metadata
                    .source
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                embedding,
            })
            .collect::<Vec<_>>();

        log::info!("Vector index built with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank entries against a query embedding.
    ///
    /// Applies the category filter first, drops entries below the score
    /// threshold, and returns at most `top_k` passages, best first.
    pub fn search(
        &self,
        query_embedding: &[f32],
        category_filter: Option<&str>,
        top_k: usize,
        score_threshold: f32,
    ) -> Vec<Passage> {
        let filter = category_filter.map(|c| c.to_lowercase());

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .filter(|entry| match (&filter, &entry.category) {
                (Some(wanted), Some(have)) => wanted == have,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .map(|entry| (cosine_similarity(query_embedding, &entry.embedding), entry))
            .filter(|(score, _)| *score >= score_threshold)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(score, entry)| Passage {
                text: entry.text.clone(),
                source: entry.source.clone(),
                score: Some(score),
            })
            .collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of passages to return
    pub top_k: usize,
    /// Minimum similarity score to include a passage
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.2,
        }
    }
}

/// Knowledge retriever backed by the vector index.
pub struct IndexRetriever {
    index: Arc<VectorIndex>,
    embedder: EmbeddingClient,
    config: RetrievalConfig,
}

impl IndexRetriever {
    /// Create a retriever over a built index.
    pub fn new(index: Arc<VectorIndex>, embedder: EmbeddingClient, config: RetrievalConfig) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }
}

#[async_trait]
impl KnowledgeRetriever for IndexRetriever {
    async fn retrieve(&self, query: &str, category_filter: Option<&str>) -> Result<Vec<Passage>> {
        let query_embedding = self.embedder.embed(query).await?;
        let passages = self.index.search(
            &query_embedding,
            category_filter,
            self.config.top_k,
            self.config.score_threshold,
        );
        log::info!(
            "Retrieved {} passages for query: {:.50}...",
            passages.len(),
            query
        );
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(text: &str, category: Option<&str>, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            text: text.to_string(),
            category: category.map(|c| c.to_string()),
            source: format!("{}.md", text),
            embedding,
        }
    }

    fn sample_index() -> VectorIndex {
        VectorIndex {
            entries: vec![
                entry("api keys", Some("technical"), vec![1.0, 0.0]),
                entry("refund policy", Some("billing"), vec![0.0, 1.0]),
                entry("office hours", Some("general"), vec![0.7, 0.7]),
            ],
        }
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0], None, 3, 0.0);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].text, "api keys");
        assert!(results[0].score.unwrap() > results[1].score.unwrap());
    }

    #[test]
    fn test_search_applies_category_filter() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0], Some("billing"), 3, 0.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "refund policy");
    }

    #[test]
    fn test_search_applies_threshold_and_top_k() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0], None, 1, 0.5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "api keys");

        let none = index.search(&[1.0, 0.0], None, 3, 0.99);
        assert_eq!(none.len(), 1); // only the exact-direction match survives
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_knowledge_base_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"documents": [{{"text": "We accept credit cards.", "metadata": {{"category": "billing", "source": "payments.md"}}}}]}}"#
        )
        .unwrap();

        let base = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(base.documents.len(), 1);
        assert_eq!(base.documents[0].metadata.category.as_deref(), Some("billing"));
    }

    #[test]
    fn test_knowledge_base_load_missing_file() {
        let result = KnowledgeBase::load("/nonexistent/kb.json");
        assert!(matches!(result, Err(ServiceError::Io(_))));
    }
}
