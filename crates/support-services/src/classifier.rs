//! LLM-backed query classification service.

use crate::chat::ChatCompletionClient;
use crate::error::Result;
use crate::traits::QueryClassifier;
use async_trait::async_trait;

/// Fixed instruction describing the three categories. The service is asked
/// for a bare label; anything else is handled by the classify stage.
const CATEGORY_PROMPT: &str = "\
You are a customer support query classifier. Your job is to categorize the incoming customer query
into one of the following categories:

1. **Technical**: Queries related to technical issues, integrations, APIs, SDKs, deployment,
   infrastructure, performance, security, or any technology-related topics.

2. **Billing**: Queries related to pricing, payments, invoices, subscriptions, refunds,
   upgrades, downgrades, or any financial matters.

3. **General**: Queries about company information, support channels, policies, general questions,
   or anything that doesn't fit Technical or Billing categories.

Analyze the customer query and return ONLY the category name (Technical, Billing, or General).
Do not include any explanation, just the category name.";

/// Classification service backed by a chat-completion model.
#[derive(Clone)]
pub struct LlmClassifier {
    chat: ChatCompletionClient,
}

impl LlmClassifier {
    /// Create a classifier over the given chat client.
    pub fn new(chat: ChatCompletionClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl QueryClassifier for LlmClassifier {
    async fn classify(&self, query: &str) -> Result<String> {
        let prompt = format!("Customer Query:\n{}\n\nCategory:", query);
        let label = self.chat.complete(Some(CATEGORY_PROMPT), &prompt).await?;
        Ok(label.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_all_categories() {
        for label in ["Technical", "Billing", "General"] {
            assert!(CATEGORY_PROMPT.contains(label));
        }
    }
}
