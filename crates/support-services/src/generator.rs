//! LLM-backed response generation service.

use crate::chat::ChatCompletionClient;
use crate::error::Result;
use crate::traits::ResponseGenerator;
use async_trait::async_trait;

/// Generation service backed by a chat-completion model.
///
/// Substitutes `{context}` and `{query}` into the caller's instruction
/// template and sends the composed prompt as a single user message.
#[derive(Clone)]
pub struct LlmGenerator {
    chat: ChatCompletionClient,
}

impl LlmGenerator {
    /// Create a generator over the given chat client.
    pub fn new(chat: ChatCompletionClient) -> Self {
        Self { chat }
    }

    fn fill_template(instruction_template: &str, context: &str, query: &str) -> String {
        instruction_template
            .replace("{context}", context)
            .replace("{query}", query)
    }
}

#[async_trait]
impl ResponseGenerator for LlmGenerator {
    async fn generate(
        &self,
        instruction_template: &str,
        context: &str,
        query: &str,
    ) -> Result<String> {
        let prompt = Self::fill_template(instruction_template, context, query);
        self.chat.complete(None, &prompt).await
    }
}
