//! Persona implementations
//!
//! Each persona pairs fixed role instructions with a user prompt rendered
//! from the context bundle, and calls the shared provider through
//! `PersonaClient`. All personas return untrusted free text.

mod analysts;
mod client;
mod insight;
mod research;
mod risk;

pub use analysts::{
    ChiefStrategist, FundamentalAnalyst, RiskManager, SentimentAnalyst, TechnicalAnalyst,
};
pub use client::PersonaClient;
pub use insight::MemoryAnalyst;
pub use research::{BearResearcher, BullResearcher, ResearchDirector};
pub use risk::{
    AggressiveRiskAnalyst, ConservativeRiskAnalyst, NeutralRiskAnalyst, RiskDirector,
};
