//! Error types for memo-core

use thiserror::Error;

/// Result type alias for memo-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for persona operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Text generation for a persona failed
    #[error("Generation failed for {persona}: {reason}")]
    GenerationFailed {
        persona: String,
        reason: String,
    },

    /// Persona processing failed
    #[error("Persona processing failed: {0}")]
    ProcessingFailed(String),
}
