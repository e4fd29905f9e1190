//! Deliberation engine for memo-rs
//!
//! This crate implements the core of the system: specialized personas
//! coordinated into a multi-stage deliberation that produces an
//! investment-analysis memo with a structured, mechanically extracted
//! trading signal. It includes:
//!
//! - The persona layer (`personas`) over a `memo_llm` provider
//! - The free-text signal extraction engine (`extract`)
//! - The structured debate protocol (`debate`): bull/bear research and
//!   conservative/aggressive/neutral risk debates with multi-round
//!   counter-argument exchange
//! - Memory and similarity retrieval (`memory`): TF-IDF retrieval over past
//!   deliberations, insight synthesis, outcome tracking and analytics
//! - The two-tier pipeline (`pipeline`): advanced path with debates and
//!   memory, basic five-persona path, and the fallback wrapper
//! - The consistency validator that gates memo completion
//!
//! # Example
//!
//! ```rust,ignore
//! use memo_engine::{DeliberationEngine, EngineConfig};
//! use memo_engine::market::{FundamentalSnapshot, SentimentSnapshot, TechnicalSnapshot};
//! use memo_llm::providers::AnthropicProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(AnthropicProvider::from_env()?);
//!     let engine = DeliberationEngine::new(provider, EngineConfig::default());
//!
//!     let memo = engine
//!         .generate_enhanced_memo(
//!             "AAPL",
//!             &FundamentalSnapshot::for_ticker("AAPL"),
//!             &TechnicalSnapshot::for_ticker("AAPL"),
//!             &SentimentSnapshot::for_ticker("AAPL"),
//!         )
//!         .await?;
//!
//!     println!("{} -> {}", memo.ticker, memo.signal.recommendation);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod debate;
pub mod error;
pub mod extract;
pub mod market;
pub mod memo;
pub mod memory;
pub mod personas;
pub mod pipeline;
pub mod prompts;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use debate::{ResearchDebate, ResearchDebateReport, RiskDebate, RiskDebateReport};
pub use error::{EngineError, Result};
pub use memo::{
    ExtractedSignal, FeatureFlags, Memo, MemoStatus, PipelineMode, Recommendation, RiskCategory,
};
pub use memory::{CandidateMemo, MemorySubsystem, Outcome, SimilarityRecord, TimeWindow};
pub use pipeline::DeliberationEngine;

// Re-export the provider trait so engine consumers need not depend on
// memo-llm directly
pub use memo_llm::LLMProvider;
