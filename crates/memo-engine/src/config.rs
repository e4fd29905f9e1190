//! Configuration for deliberation runs

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the deliberation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Max tokens per persona completion
    pub max_tokens: usize,

    /// Sampling temperature for persona calls
    pub temperature: f32,

    /// Rounds in the bull/bear research debate
    pub research_rounds: usize,

    /// Rounds in the conservative/aggressive/neutral risk debate
    pub risk_rounds: usize,

    /// Whether the research debate stage runs
    pub enable_research_debate: bool,

    /// Whether the multi-perspective risk debate runs
    pub enable_risk_debate: bool,

    /// Whether memory retrieval and storage run
    pub enable_memory: bool,

    /// Max similar records returned by retrieval
    pub retrieval_limit: usize,

    /// Minimum cosine similarity for retrieval
    pub min_similarity: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
            research_rounds: 2,
            risk_rounds: 2,
            enable_research_debate: true,
            enable_risk_debate: true,
            enable_memory: true,
            retrieval_limit: 10,
            min_similarity: 0.3,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(EngineError::ConfigError("model must not be empty".into()));
        }
        if self.research_rounds == 0 || self.risk_rounds == 0 {
            return Err(EngineError::ConfigError(
                "debate round counts must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(EngineError::ConfigError(format!(
                "min_similarity must be in [0, 1], got {}",
                self.min_similarity
            )));
        }
        if self.retrieval_limit == 0 {
            return Err(EngineError::ConfigError(
                "retrieval_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: Option<EngineConfig>,
}

impl EngineConfigBuilder {
    fn config(&mut self) -> &mut EngineConfig {
        self.config.get_or_insert_with(EngineConfig::default)
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config().model = model.into();
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config().max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config().temperature = temperature;
        self
    }

    /// Set research debate round count
    pub fn research_rounds(mut self, rounds: usize) -> Self {
        self.config().research_rounds = rounds;
        self
    }

    /// Set risk debate round count
    pub fn risk_rounds(mut self, rounds: usize) -> Self {
        self.config().risk_rounds = rounds;
        self
    }

    /// Toggle the research debate stage
    pub fn enable_research_debate(mut self, enabled: bool) -> Self {
        self.config().enable_research_debate = enabled;
        self
    }

    /// Toggle the risk debate stage
    pub fn enable_risk_debate(mut self, enabled: bool) -> Self {
        self.config().enable_risk_debate = enabled;
        self
    }

    /// Toggle memory retrieval and storage
    pub fn enable_memory(mut self, enabled: bool) -> Self {
        self.config().enable_memory = enabled;
        self
    }

    /// Set the retrieval limit
    pub fn retrieval_limit(mut self, limit: usize) -> Self {
        self.config().retrieval_limit = limit;
        self
    }

    /// Set the minimum similarity threshold
    pub fn min_similarity(mut self, threshold: f64) -> Self {
        self.config().min_similarity = threshold;
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> Result<EngineConfig> {
        let config = self.config().clone();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::builder()
            .model("gpt-4o")
            .research_rounds(3)
            .enable_memory(false)
            .build()
            .expect("valid config");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.research_rounds, 3);
        assert!(!config.enable_memory);
    }

    #[test]
    fn test_invalid_rounds_rejected() {
        let result = EngineConfig::builder().research_rounds(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_similarity_rejected() {
        let result = EngineConfig::builder().min_similarity(1.5).build();
        assert!(result.is_err());
    }
}
