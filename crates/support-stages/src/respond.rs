//! Response stages for the technical, billing, and general branches.
//!
//! All three branches run the same algorithm with a different domain
//! binding: retrieve supporting passages, fold them into a context block,
//! ask the generation service for a response, trim it. Any failure along
//! the way is absorbed into the domain's fixed fallback message, so the
//! pipeline always terminates with a response.

use crate::log_excerpt;
use async_trait::async_trait;
use pipeline_engine::{Category, Stage, StateUpdate, TicketState};
use support_services::{KnowledgeRetriever, Passage, ResponseGenerator, ServiceError};
use std::sync::Arc;

const TECHNICAL_PROMPT: &str = "\
You are a technical support specialist with deep expertise in our platform.

Craft a clear and detailed technical support response for the following customer query.
Use the retrieved knowledge base information below to provide accurate, specific guidance.

Guidelines:
- Be precise and technical but also clear and understandable
- Include specific examples, code snippets, or configuration details when relevant
- Reference documentation sources when applicable
- If the retrieved information doesn't fully answer the question, acknowledge what you know
  and suggest additional resources or next steps
- Keep the response professional and helpful

Retrieved Knowledge Base Information:
{context}

Customer Query:
{query}

Technical Support Response:";

const BILLING_PROMPT: &str = "\
You are a billing support specialist focused on helping customers with financial matters.

Craft a clear and detailed billing support response for the following customer query.
Use the retrieved knowledge base information below to provide accurate answers about pricing,
payments, invoices, refunds, or subscription matters.

Guidelines:
- Be clear about pricing, payment terms, and policies
- Include specific details like pricing tiers, payment methods, and timeframes
- If discussing refunds or disputes, be empathetic and helpful
- Reference official policies when applicable
- For account-specific issues, direct the customer to the appropriate channel
- Keep the response professional and reassuring

Retrieved Knowledge Base Information:
{context}

Customer Query:
{query}

Billing Support Response:";

const GENERAL_PROMPT: &str = "\
You are a customer support representative helping customers with general inquiries.

Craft a clear and helpful response for the following customer query.
Use the retrieved knowledge base information below to provide accurate information about
our company, policies, support channels, or general questions.

Guidelines:
- Be friendly, professional, and helpful
- Provide complete and accurate information
- Include relevant links or contact information when appropriate
- If the question is outside your knowledge, direct them to the right resource
- Keep the response concise but thorough

Retrieved Knowledge Base Information:
{context}

Customer Query:
{query}

Support Response:";

const TECHNICAL_FALLBACK: &str = "\
I apologize, but I encountered an error while processing your technical question. \
Please contact our technical support team at support@company.com for immediate assistance.";

const BILLING_FALLBACK: &str = "\
I apologize, but I encountered an error while processing your billing question. \
Please contact our billing team at billing@company.com for immediate assistance.";

const GENERAL_FALLBACK: &str = "\
I apologize, but I encountered an error while processing your question. \
Please contact our support team at support@company.com for assistance.";

/// Everything that differs between the three response branches.
struct DomainBinding {
    id: &'static str,
    category: Category,
    instruction: &'static str,
    empty_context: &'static str,
    fallback: &'static str,
}

/// Terminal stage that answers a query with retrieval plus generation.
pub struct RespondStage {
    binding: DomainBinding,
    retriever: Arc<dyn KnowledgeRetriever>,
    generator: Arc<dyn ResponseGenerator>,
}

impl RespondStage {
    /// Response stage for the technical branch.
    pub fn technical(
        retriever: Arc<dyn KnowledgeRetriever>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        Self {
            binding: DomainBinding {
                id: "technical_response",
                category: Category::Technical,
                instruction: TECHNICAL_PROMPT,
                empty_context: "No specific documentation found for this query.",
                fallback: TECHNICAL_FALLBACK,
            },
            retriever,
            generator,
        }
    }

    /// Response stage for the billing branch.
    pub fn billing(
        retriever: Arc<dyn KnowledgeRetriever>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        Self {
            binding: DomainBinding {
                id: "billing_response",
                category: Category::Billing,
                instruction: BILLING_PROMPT,
                empty_context: "No specific billing information found for this query.",
                fallback: BILLING_FALLBACK,
            },
            retriever,
            generator,
        }
    }

    /// Response stage for the general branch.
    pub fn general(
        retriever: Arc<dyn KnowledgeRetriever>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        Self {
            binding: DomainBinding {
                id: "general_response",
                category: Category::General,
                instruction: GENERAL_PROMPT,
                empty_context: "No specific information found for this query.",
                fallback: GENERAL_FALLBACK,
            },
            retriever,
            generator,
        }
    }

    /// The domain fallback text returned on any retrieval or generation
    /// failure.
    pub fn fallback_text(&self) -> &'static str {
        self.binding.fallback
    }

    async fn respond(&self, query: &str, filter: Option<&str>) -> support_services::Result<String> {
        let passages = self.retriever.retrieve(query, filter).await?;

        let context = if passages.is_empty() {
            self.binding.empty_context.to_string()
        } else {
            format_passages(&passages)
        };

        let generated = self
            .generator
            .generate(self.binding.instruction, &context, query)
            .await?;

        let trimmed = generated.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::MalformedResponse(
                "generation produced empty text".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// Concatenate passages into one context block, each tagged with its
/// provenance.
fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| format!("[Source: {}]\n{}", p.source, p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Stage for RespondStage {
    fn id(&self) -> &str {
        self.binding.id
    }

    async fn run(&self, state: &TicketState) -> StateUpdate {
        let query = state.query();
        log::info!(
            "Generating {} response for: {}...",
            self.binding.category,
            log_excerpt(query)
        );

        // The filter is attached only when the classified category already
        // matches this stage's own domain; a query routed here under a
        // different category searches the whole knowledge base.
        let filter = if state.category() == Some(self.binding.category) {
            Some(self.binding.category.filter_label())
        } else {
            None
        };

        match self.respond(query, filter).await {
            Ok(response) => {
                log::info!("{} response generated successfully", self.binding.category);
                StateUpdate::with_response(response)
            }
            Err(e) => {
                log::error!(
                    "Error generating {} response for '{}...': {}",
                    self.binding.category,
                    log_excerpt(query),
                    e
                );
                StateUpdate::with_response(self.binding.fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use support_services::Result;

    struct FixedRetriever {
        passages: Vec<Passage>,
        seen_filter: Mutex<Option<Option<String>>>,
    }

    impl FixedRetriever {
        fn new(passages: Vec<Passage>) -> Arc<Self> {
            Arc::new(Self {
                passages,
                seen_filter: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl KnowledgeRetriever for FixedRetriever {
        async fn retrieve(&self, _query: &str, category_filter: Option<&str>) -> Result<Vec<Passage>> {
            *self.seen_filter.lock().unwrap() = Some(category_filter.map(|s| s.to_string()));
            Ok(self.passages.clone())
        }
    }

    struct CapturingGenerator {
        reply: &'static str,
        seen_context: Mutex<Option<String>>,
    }

    impl CapturingGenerator {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen_context: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ResponseGenerator for CapturingGenerator {
        async fn generate(&self, _instruction: &str, context: &str, _query: &str) -> Result<String> {
            *self.seen_context.lock().unwrap() = Some(context.to_string());
            Ok(self.reply.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ResponseGenerator for FailingGenerator {
        async fn generate(&self, _instruction: &str, _context: &str, _query: &str) -> Result<String> {
            Err(ServiceError::Api {
                status: 500,
                body: "model unavailable".to_string(),
            })
        }
    }

    fn passage(text: &str, source: &str) -> Passage {
        Passage {
            text: text.to_string(),
            source: source.to_string(),
            score: Some(0.9),
        }
    }

    fn classified(query: &str, category: Category) -> TicketState {
        let mut state = TicketState::new(query);
        state.apply(StateUpdate::with_category(category));
        state
    }

    #[tokio::test]
    async fn test_response_is_generated_and_trimmed() {
        let retriever = FixedRetriever::new(vec![passage("Rotate keys in settings.", "keys.md")]);
        let generator = CapturingGenerator::new("  Here is how you rotate keys.  \n");
        let stage = RespondStage::technical(retriever, generator.clone());

        let state = classified("How do I rotate my API key?", Category::Technical);
        let update = stage.run(&state).await;

        assert_eq!(update.response.as_deref(), Some("Here is how you rotate keys."));
        let context = generator.seen_context.lock().unwrap().clone().unwrap();
        assert_eq!(context, "[Source: keys.md]\nRotate keys in settings.");
    }

    #[tokio::test]
    async fn test_passages_are_tagged_with_provenance() {
        let retriever = FixedRetriever::new(vec![
            passage("First fact.", "a.md"),
            passage("Second fact.", "b.md"),
        ]);
        let generator = CapturingGenerator::new("answer");
        let stage = RespondStage::general(retriever, generator.clone());

        stage.run(&classified("q", Category::General)).await;

        let context = generator.seen_context.lock().unwrap().clone().unwrap();
        assert_eq!(
            context,
            "[Source: a.md]\nFirst fact.\n\n[Source: b.md]\nSecond fact."
        );
    }

    #[tokio::test]
    async fn test_empty_retrieval_uses_placeholder() {
        let retriever = FixedRetriever::new(vec![]);
        let generator = CapturingGenerator::new("We are open 9 to 5.");
        let stage = RespondStage::general(retriever, generator.clone());

        let state = classified("What are your office hours?", Category::General);
        let update = stage.run(&state).await;

        assert_eq!(update.response.as_deref(), Some("We are open 9 to 5."));
        let context = generator.seen_context.lock().unwrap().clone().unwrap();
        assert_eq!(context, "No specific information found for this query.");
    }

    #[tokio::test]
    async fn test_generation_failure_yields_domain_fallback() {
        let retriever = FixedRetriever::new(vec![passage("Plans start at $10.", "pricing.md")]);
        let stage = RespondStage::billing(retriever, Arc::new(FailingGenerator));

        let state = classified("Why was I charged twice?", Category::Billing);
        let update = stage.run(&state).await;

        assert_eq!(update.response.as_deref(), Some(BILLING_FALLBACK));
    }

    #[tokio::test]
    async fn test_empty_generation_yields_domain_fallback() {
        let retriever = FixedRetriever::new(vec![]);
        let generator = CapturingGenerator::new("   \n");
        let stage = RespondStage::technical(retriever, generator);

        let update = stage.run(&classified("q", Category::Technical)).await;
        assert_eq!(update.response.as_deref(), Some(TECHNICAL_FALLBACK));
    }

    #[tokio::test]
    async fn test_filter_set_only_for_matching_category() {
        let retriever = FixedRetriever::new(vec![]);
        let generator = CapturingGenerator::new("answer");
        let stage = RespondStage::billing(retriever.clone(), generator);

        stage.run(&classified("q", Category::Billing)).await;
        assert_eq!(
            retriever.seen_filter.lock().unwrap().clone().unwrap(),
            Some("billing".to_string())
        );

        stage.run(&classified("q", Category::General)).await;
        assert_eq!(retriever.seen_filter.lock().unwrap().clone().unwrap(), None);
    }

    #[tokio::test]
    async fn test_stage_ids_match_branches() {
        let retriever = FixedRetriever::new(vec![]);
        let generator = CapturingGenerator::new("a");
        assert_eq!(
            RespondStage::technical(retriever.clone(), generator.clone()).id(),
            "technical_response"
        );
        assert_eq!(
            RespondStage::billing(retriever.clone(), generator.clone()).id(),
            "billing_response"
        );
        assert_eq!(
            RespondStage::general(retriever, generator).id(),
            "general_response"
        );
    }
}
