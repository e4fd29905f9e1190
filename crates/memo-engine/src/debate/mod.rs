//! Structured multi-round debates between opposing personas
//!
//! A debate runs a fixed number of rounds. In round 0 every participant
//! sees only the shared context bundle; in round k each participant sees
//! the bundle plus the *previous* round's outputs from every other
//! participant, labelled as arguments to address. Participants within a
//! round are independent, so their calls are joined concurrently.
//!
//! A persona failure never aborts a debate: the failing slot degrades to an
//! inline error string and the round advances, because downstream stages
//! must always receive some text per slot.

pub mod research;
pub mod risk;

pub use research::{KeyPoints, ResearchDebate, ResearchDebateReport};
pub use risk::{
    ConfidenceLevels, FinalRiskCall, PositionRecommendations, RiskDebate, RiskDebateReport,
    RiskMetrics,
};

use serde::{Deserialize, Serialize};

/// One participant's output within a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Participant label ("Bull", "Conservative", ...)
    pub side: String,
    /// The participant's analysis text for this round
    pub analysis: String,
}

/// One debate round: the round index plus one entry per participant
///
/// A debate's history is an ordered, append-only sequence of these; it is
/// never reordered or truncated once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRound {
    /// Zero-based round index
    pub index: usize,
    /// Outputs in participant order
    pub entries: Vec<RoundEntry>,
}

impl DebateRound {
    /// Human-readable transcript lines for this round
    pub fn transcript(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "Round {} - {} Analysis: {}",
                    self.index + 1,
                    entry.side,
                    entry.analysis
                )
            })
            .collect()
    }
}

/// Flatten a debate history into transcript lines
pub fn transcript(history: &[DebateRound]) -> Vec<String> {
    history.iter().flat_map(DebateRound::transcript).collect()
}

/// Degrade a persona failure into the inline error string for its slot
pub(crate) fn degraded(persona: &str, err: &memo_core::Error) -> String {
    format!("Error in {persona}: {err}")
}
