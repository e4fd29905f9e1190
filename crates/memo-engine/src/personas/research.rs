//! Research debate personas: bull, bear, and the neutral synthesizer

use super::PersonaClient;
use crate::prompts::{system, user};
use async_trait::async_trait;
use memo_core::{ContextBundle, Persona, Result};

fn template_error(e: crate::error::EngineError) -> memo_core::Error {
    memo_core::Error::ProcessingFailed(e.to_string())
}

/// Advocate for the investment case
pub struct BullResearcher {
    client: PersonaClient,
}

impl BullResearcher {
    /// Create a new bull researcher
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for BullResearcher {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::bull(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::BULL_RESEARCHER, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "BullResearcher"
    }
}

/// Advocate for the downside case
pub struct BearResearcher {
    client: PersonaClient,
}

impl BearResearcher {
    /// Create a new bear researcher
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for BearResearcher {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::bear(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::BEAR_RESEARCHER, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "BearResearcher"
    }
}

/// Neutral synthesizer that closes the research debate
pub struct ResearchDirector {
    client: PersonaClient,
}

impl ResearchDirector {
    /// Create a new research director
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }

    /// Synthesize the final-round bull and bear arguments
    pub async fn synthesize(
        &self,
        ticker: &str,
        bull_analysis: &str,
        bear_analysis: &str,
    ) -> Result<String> {
        let prompt = user::research_synthesis(ticker, bull_analysis, bear_analysis)
            .map_err(template_error)?;
        self.client
            .generate("ResearchDirector", system::RESEARCH_DIRECTOR, &prompt)
            .await
    }
}
