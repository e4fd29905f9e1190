//! Context bundle passed into persona invocations
//!
//! The `ContextBundle` is a map of named facts (ticker, market snapshots,
//! upstream analyses, debate arguments) handed to a persona call. Bundles are
//! additive: a stage never mutates the bundle it received, it derives a new
//! bundle that is a superset of the previous one via [`ContextBundle::with`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known bundle keys shared across pipeline stages
pub mod keys {
    /// Ticker symbol under deliberation
    pub const TICKER: &str = "ticker";
    /// Fundamental analyst output
    pub const FUNDAMENTAL_ANALYSIS: &str = "fundamental_analysis";
    /// Technical analyst output
    pub const TECHNICAL_ANALYSIS: &str = "technical_analysis";
    /// Sentiment analyst output
    pub const SENTIMENT_ANALYSIS: &str = "sentiment_analysis";
    /// Chief strategist synthesis
    pub const CHIEF_ANALYSIS: &str = "chief_strategist_analysis";
    /// Bull researcher arguments to address
    pub const BULL_ARGUMENTS: &str = "bull_arguments";
    /// Bear researcher arguments to address
    pub const BEAR_ARGUMENTS: &str = "bear_arguments";
    /// Conservative risk analyst arguments to address
    pub const CONSERVATIVE_ARGUMENTS: &str = "conservative_arguments";
    /// Aggressive risk analyst arguments to address
    pub const AGGRESSIVE_ARGUMENTS: &str = "aggressive_arguments";
    /// Neutral risk analyst arguments to address
    pub const NEUTRAL_ARGUMENTS: &str = "neutral_arguments";
    /// Balanced synthesis of the research debate
    pub const DEBATE_SYNTHESIS: &str = "debate_synthesis";
    /// Insight text retrieved from the memory subsystem
    pub const MEMORY_CONTEXT: &str = "memory_context";
    /// Investment thesis under risk evaluation
    pub const INVESTMENT_THESIS: &str = "investment_thesis";
    /// Condensed market-condition summary for the risk debate
    pub const MARKET_CONDITIONS: &str = "market_conditions";
    /// Proposed position (recommendation, confidence, size)
    pub const PROPOSED_POSITION: &str = "proposed_position";
}

/// Immutable-per-stage fact map passed to persona invocations
///
/// # Example
///
/// ```
/// use memo_core::ContextBundle;
///
/// let base = ContextBundle::for_ticker("AAPL");
/// let extended = base.clone().with("fundamental_analysis", "Margins are widening.");
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(extended.len(), 2);
/// assert_eq!(extended.ticker(), Some("AAPL"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Named facts, ordered by key for deterministic prompt rendering
    facts: BTreeMap<String, serde_json::Value>,
}

impl ContextBundle {
    /// Create a new empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle seeded with the ticker fact
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self::new().with(keys::TICKER, ticker.into())
    }

    /// Derive a superset bundle with one additional fact
    ///
    /// Accepts anything serializable; a value that fails to serialize is
    /// stored as JSON null rather than dropping the key, so the bundle
    /// shape stays predictable.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.facts.insert(key.into(), json);
        self
    }

    /// Derive a superset bundle with a text fact, skipping empty strings
    pub fn with_text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let text = value.into();
        if text.is_empty() {
            return self;
        }
        self.with(key, text)
    }

    // =========== Accessors ===========

    /// Get a raw fact value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.facts.get(key)
    }

    /// Get a fact as text
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.facts.get(key).and_then(|v| v.as_str())
    }

    /// Get a fact as text, or a caller-supplied placeholder
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// Get the ticker fact
    pub fn ticker(&self) -> Option<&str> {
        self.get_str(keys::TICKER)
    }

    /// Check whether a fact is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    /// Number of facts in the bundle
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the bundle carries no facts
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate facts in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the bundle as `key: value` lines for a persona prompt
    ///
    /// Null facts are skipped so partial market snapshots degrade to a
    /// shorter prompt instead of noise. String values render unquoted.
    pub fn render_facts(&self) -> String {
        let mut lines = Vec::with_capacity(self.facts.len());
        for (key, value) in &self.facts {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => lines.push(format!("{key}: {s}")),
                other => lines.push(format!("{key}: {other}")),
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_derives_superset() {
        let base = ContextBundle::for_ticker("NVDA");
        let extended = base
            .clone()
            .with(keys::FUNDAMENTAL_ANALYSIS, "Strong data-center growth.");

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(
            extended.get_str(keys::FUNDAMENTAL_ANALYSIS),
            Some("Strong data-center growth.")
        );
        // The original bundle is untouched
        assert!(!base.contains_key(keys::FUNDAMENTAL_ANALYSIS));
    }

    #[test]
    fn test_with_text_skips_empty() {
        let bundle = ContextBundle::new().with_text(keys::BULL_ARGUMENTS, "");
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_get_str_or() {
        let bundle = ContextBundle::for_ticker("AAPL");
        assert_eq!(
            bundle.get_str_or(keys::TECHNICAL_ANALYSIS, "No technical analysis available"),
            "No technical analysis available"
        );
        assert_eq!(bundle.get_str_or(keys::TICKER, "?"), "AAPL");
    }

    #[test]
    fn test_render_facts_skips_null() {
        let bundle = ContextBundle::for_ticker("AAPL")
            .with("pe_ratio", 27.5)
            .with("dividend_yield", serde_json::Value::Null);

        let rendered = bundle.render_facts();
        assert!(rendered.contains("ticker: AAPL"));
        assert!(rendered.contains("pe_ratio: 27.5"));
        assert!(!rendered.contains("dividend_yield"));
    }

    #[test]
    fn test_render_facts_deterministic_order() {
        let a = ContextBundle::new().with("b", 2).with("a", 1);
        let b = ContextBundle::new().with("a", 1).with("b", 2);
        assert_eq!(a.render_facts(), b.render_facts());
    }

    #[test]
    fn test_serde_roundtrip() {
        let bundle = ContextBundle::for_ticker("MSFT").with("volume", 1_000_000);
        let json = serde_json::to_string(&bundle).expect("serialize");
        let back: ContextBundle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.ticker(), Some("MSFT"));
        assert_eq!(back.len(), 2);
    }
}
