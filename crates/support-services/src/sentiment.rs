//! LLM-backed sentiment analysis service.

use crate::chat::ChatCompletionClient;
use crate::error::Result;
use crate::traits::SentimentAnalyzer;
use async_trait::async_trait;

/// Fixed instruction describing the three sentiments with illustrative
/// examples per category.
const SENTIMENT_PROMPT: &str = "\
You are a sentiment analysis expert. Your job is to analyze the emotional tone of customer queries
to help prioritize support requests.

Analyze the customer query below and classify its sentiment into ONE of these categories:

1. **Positive**: Customer is happy, satisfied, expressing gratitude, or being complimentary.
   Examples: \"Thank you for the great service!\", \"I love this feature!\"

2. **Neutral**: Customer is asking a straightforward question without strong emotion.
   Examples: \"What payment methods do you support?\", \"How do I integrate with AWS?\"

3. **Negative**: Customer is frustrated, angry, disappointed, or expressing dissatisfaction.
   Examples: \"This is terrible!\", \"I'm very frustrated\", \"This doesn't work at all\"

Return ONLY the sentiment category (Positive, Neutral, or Negative).
Do not include any explanation, just the sentiment.";

/// Sentiment service backed by a chat-completion model.
#[derive(Clone)]
pub struct LlmSentimentAnalyzer {
    chat: ChatCompletionClient,
}

impl LlmSentimentAnalyzer {
    /// Create a sentiment analyzer over the given chat client.
    pub fn new(chat: ChatCompletionClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl SentimentAnalyzer for LlmSentimentAnalyzer {
    async fn analyze(&self, query: &str) -> Result<String> {
        let prompt = format!("Customer Query:\n{}\n\nSentiment:", query);
        let label = self.chat.complete(Some(SENTIMENT_PROMPT), &prompt).await?;
        Ok(label.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_all_sentiments() {
        for label in ["Positive", "Neutral", "Negative"] {
            assert!(SENTIMENT_PROMPT.contains(label));
        }
    }
}
