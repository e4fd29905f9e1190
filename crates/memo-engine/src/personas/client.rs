//! Shared provider access for personas

use crate::config::EngineConfig;
use memo_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::debug;

/// Thin client layering the persona contract over the provider
///
/// One instance is shared by every persona in a deliberation; it carries the
/// model parameters and converts provider failures into the persona-level
/// generation error.
#[derive(Clone)]
pub struct PersonaClient {
    provider: Arc<dyn LLMProvider>,
    config: Arc<EngineConfig>,
}

impl PersonaClient {
    /// Create a new client
    pub fn new(provider: Arc<dyn LLMProvider>, config: Arc<EngineConfig>) -> Self {
        Self { provider, config }
    }

    /// Generate analysis text for one persona invocation
    ///
    /// No retries here: the caller owns failure policy (inline degradation
    /// inside debates, fallback at top-level stages).
    pub async fn generate(
        &self,
        persona: &str,
        instructions: &str,
        user_prompt: &str,
    ) -> memo_core::Result<String> {
        debug!(persona, provider = self.provider.name(), "persona call");

        let request = CompletionRequest::builder(self.config.model.as_str())
            .system(instructions)
            .add_message(Message::user(user_prompt))
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self.provider.complete(request).await.map_err(|e| {
            memo_core::Error::GenerationFailed {
                persona: persona.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(response.message.text().to_string())
    }

    /// The engine configuration this client was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
