//! Error types for deliberation operations

use thiserror::Error;

/// Deliberation engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A persona invocation failed at a top-level pipeline stage
    #[error("Persona failure in {stage}: {reason}")]
    StageFailed {
        stage: String,
        reason: String,
    },

    /// Prompt template rendering failed
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Memory subsystem error
    #[error("Memory error: {0}")]
    MemoryError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Both the advanced and the fallback path failed
    #[error("Deliberation failed and fallback also failed: {0}")]
    FallbackFailed(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for deliberation operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Convert core persona errors into engine errors
impl From<memo_core::Error> for EngineError {
    fn from(err: memo_core::Error) -> Self {
        EngineError::Other(err.to_string())
    }
}

/// Convert provider errors into engine errors
impl From<memo_llm::LLMError> for EngineError {
    fn from(err: memo_llm::LLMError) -> Self {
        EngineError::Other(err.to_string())
    }
}

impl From<minijinja::Error> for EngineError {
    fn from(err: minijinja::Error) -> Self {
        EngineError::TemplateError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::StageFailed {
            stage: "fundamental_analysis".to_string(),
            reason: "provider unreachable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Persona failure in fundamental_analysis: provider unreachable"
        );
    }

    #[test]
    fn test_error_conversion() {
        let core_err = memo_core::Error::ProcessingFailed("boom".to_string());
        let engine_err: EngineError = core_err.into();
        assert!(engine_err.to_string().contains("boom"));
    }
}
