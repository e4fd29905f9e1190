//! The five core analytical personas
//!
//! These are the personas of the basic pipeline: three specialists, the
//! chief strategist who synthesizes them, and the single-perspective risk
//! manager used when the risk debate is disabled.

use super::PersonaClient;
use crate::prompts::{system, user};
use async_trait::async_trait;
use memo_core::{ContextBundle, Persona, Result};

fn template_error(e: crate::error::EngineError) -> memo_core::Error {
    memo_core::Error::ProcessingFailed(e.to_string())
}

/// Persona specialized in fundamental analysis
pub struct FundamentalAnalyst {
    client: PersonaClient,
}

impl FundamentalAnalyst {
    /// Create a new fundamental analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for FundamentalAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::fundamental(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::FUNDAMENTAL_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "FundamentalAnalyst"
    }
}

/// Persona specialized in technical analysis
pub struct TechnicalAnalyst {
    client: PersonaClient,
}

impl TechnicalAnalyst {
    /// Create a new technical analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for TechnicalAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::technical(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::TECHNICAL_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "TechnicalAnalyst"
    }
}

/// Persona specialized in news and sentiment analysis
pub struct SentimentAnalyst {
    client: PersonaClient,
}

impl SentimentAnalyst {
    /// Create a new sentiment analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for SentimentAnalyst {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::sentiment(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::SENTIMENT_ANALYST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "SentimentAnalyst"
    }
}

/// Persona that synthesizes the specialists into one thesis
///
/// Its narrative is the memo's thesis text: the recommendation and
/// confidence signals are extracted from it, and the validator later checks
/// the recommendation word appears in it.
pub struct ChiefStrategist {
    client: PersonaClient,
}

impl ChiefStrategist {
    /// Create a new chief strategist
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for ChiefStrategist {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::chief(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::CHIEF_STRATEGIST, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "ChiefStrategist"
    }
}

/// Single-perspective risk manager (basic pipeline, or risk debate disabled)
pub struct RiskManager {
    client: PersonaClient,
}

impl RiskManager {
    /// Create a new risk manager
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Persona for RiskManager {
    async fn analyze(&self, context: &ContextBundle) -> Result<String> {
        let prompt = user::risk_manager(context).map_err(template_error)?;
        self.client
            .generate(self.name(), system::RISK_MANAGER, &prompt)
            .await
    }

    fn name(&self) -> &str {
        "RiskManager"
    }
}
