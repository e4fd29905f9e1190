//! Text-generation provider abstraction for memo-rs
//!
//! This crate provides provider-agnostic abstractions for the persona
//! service boundary. It includes:
//!
//! - Message types for conversation turns
//! - Completion request/response types
//! - Provider trait for text-generation implementations
//! - Concrete provider implementations (behind feature flags)
//!
//! Personas are plain text-in/text-out: there is no tool calling and no
//! multi-modal content at this boundary. Callers must treat the returned
//! text as untrusted natural language with no guaranteed structure.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub mod providers;
