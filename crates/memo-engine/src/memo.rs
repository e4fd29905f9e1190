//! The memo aggregate and its extracted trading signal

use crate::debate::{ResearchDebateReport, RiskDebateReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trading recommendation recovered from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    /// Canonical display form, as persisted on memos
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Hold => "Hold",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk category derived from the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Categorize a 1-10 risk score: <=3 Low, <=6 Medium, else High
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Self::Low
        } else if score <= 6.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low Risk"),
            Self::Medium => write!(f, "Medium Risk"),
            Self::High => write!(f, "High Risk"),
        }
    }
}

/// Memo lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoStatus {
    /// Deliberation still in flight; never visible on a sealed memo
    Pending,
    /// Sealed: all consistency rules passed
    Complete,
    /// Sealed: a consistency rule failed, reason recorded
    Error,
}

/// Which pipeline produced the memo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Full pipeline with debates and memory
    Advanced,
    /// Five-persona pipeline, requested directly
    Basic,
    /// Five-persona pipeline, reached by falling back from the advanced path
    BasicFallback,
}

/// Record of which features ran for a memo
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub research_debate_enabled: bool,
    pub risk_debate_enabled: bool,
    pub memory_enabled: bool,
    pub mode: PipelineMode,
}

impl FeatureFlags {
    /// Flags for a plain basic run
    pub fn basic(mode: PipelineMode) -> Self {
        Self {
            research_debate_enabled: false,
            risk_debate_enabled: false,
            memory_enabled: false,
            mode,
        }
    }
}

/// Structured signal mechanically recovered from persona text
///
/// Absent fields keep their documented defaults at the call site that
/// requires one; they are never silently coerced to zero here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSignal {
    pub recommendation: Recommendation,
    /// Confidence in [0, 1]; `None` when no pattern matched and the caller
    /// did not require a default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Position size as a plain percentage of portfolio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<f64>,
    /// Risk score in [1, 10]
    pub risk_score: f64,
    pub risk_category: RiskCategory,
}

/// The terminal aggregate of one deliberation
///
/// Created once per request, extended stage by stage, then sealed by the
/// validator into `Complete` or `Error`. Never re-opened after sealing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    /// Stable identifier, `<ticker>_<timestamp>`
    pub id: String,
    pub ticker: String,
    pub created_at: DateTime<Utc>,

    pub fundamental_analysis: String,
    pub technical_analysis: String,
    pub sentiment_analysis: String,
    pub chief_analysis: String,
    pub risk_assessment: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_debate: Option<ResearchDebateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_debate: Option<RiskDebateReport>,

    pub signal: ExtractedSignal,

    pub status: MemoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    pub features: FeatureFlags,

    /// Whether the memo was written to the memory index
    pub memory_stored: bool,
}

impl Memo {
    /// Build the stable memo identifier for a ticker at a point in time
    pub fn make_id(ticker: &str, at: DateTime<Utc>) -> String {
        format!("{}_{}", ticker, at.format("%Y%m%d_%H%M%S"))
    }

    /// The thesis + risk text used for similarity indexing and retrieval
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.chief_analysis, self.risk_assessment)
    }

    /// Seal the memo with a validation outcome
    pub fn seal(&mut self, result: std::result::Result<(), String>) {
        match result {
            Ok(()) => {
                self.status = MemoStatus::Complete;
                self.error_reason = None;
            }
            Err(reason) => {
                self.status = MemoStatus::Error;
                self.error_reason = Some(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_category_boundaries() {
        assert_eq!(RiskCategory::from_score(1.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(3.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(3.1), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(6.0), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(6.1), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(10.0), RiskCategory::High);
    }

    #[test]
    fn test_memo_id_format() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T14:30:05Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(Memo::make_id("AAPL", at), "AAPL_20250301_143005");
    }

    #[test]
    fn test_seal_error_records_reason() {
        let at = Utc::now();
        let mut memo = Memo {
            id: Memo::make_id("AAPL", at),
            ticker: "AAPL".to_string(),
            created_at: at,
            fundamental_analysis: String::new(),
            technical_analysis: String::new(),
            sentiment_analysis: String::new(),
            chief_analysis: String::new(),
            risk_assessment: String::new(),
            research_debate: None,
            risk_debate: None,
            signal: ExtractedSignal {
                recommendation: Recommendation::Hold,
                confidence: None,
                position_size: None,
                risk_score: 5.0,
                risk_category: RiskCategory::Medium,
            },
            status: MemoStatus::Pending,
            error_reason: None,
            features: FeatureFlags::basic(PipelineMode::Basic),
            memory_stored: false,
        };

        memo.seal(Err("Missing critical field: fundamental_analysis".to_string()));
        assert_eq!(memo.status, MemoStatus::Error);
        assert!(
            memo.error_reason
                .as_deref()
                .expect("reason recorded")
                .contains("fundamental_analysis")
        );
    }
}
