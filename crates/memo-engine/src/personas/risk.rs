//! Risk debate personas: three perspectives and the synthesizer

use super::PersonaClient;
use crate::prompts::{system, user};
use async_trait::async_trait;
use memo_core::{ContextBundle, Persona, Result};

fn template_error(e: crate::error::EngineError) -> memo_core::Error {
    memo_core::Error::ProcessingFailed(e.to_string())
}

/// Capital-preservation perspective
pub struct ConservativeRiskAnalyst {
    client: PersonaClient,
}

impl ConservativeRiskAnalyst {
    /// Create a new conservative risk analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for ConservativeRiskAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::conservative(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::CONSERVATIVE_RISK_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "ConservativeRiskAnalyst"
    }
}

/// Upside-maximizing perspective
pub struct AggressiveRiskAnalyst {
    client: PersonaClient,
}

impl AggressiveRiskAnalyst {
    /// Create a new aggressive risk analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for AggressiveRiskAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::aggressive(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::AGGRESSIVE_RISK_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "AggressiveRiskAnalyst"
    }
}

/// Balanced perspective whose position size anchors the final call
pub struct NeutralRiskAnalyst {
    client: PersonaClient,
}

impl NeutralRiskAnalyst {
    /// Create a new neutral risk analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for NeutralRiskAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::neutral(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::NEUTRAL_RISK_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "NeutralRiskAnalyst"
    }
}

/// Neutral synthesizer that closes the risk debate
pub struct RiskDirector {
    client: PersonaClient,
}

impl RiskDirector {
    /// Create a new risk director
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }

    /// Synthesize the final-round analyses from all three perspectives
    pub async fn synthesize(
        &self,
        ticker: &str,
        conservative: &str,
        aggressive: &str,
        neutral: &str,
    ) -> Result<String> {
        let prompt = user::risk_synthesis(ticker, conservative, aggressive, neutral)
            .map_err(template_error)?;
        self.client
            .generate("RiskDirector", system::RISK_DIRECTOR, &prompt)
            .await
    }
}
