//! Concrete provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the generation services the deliberation pipeline can run against.

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};
