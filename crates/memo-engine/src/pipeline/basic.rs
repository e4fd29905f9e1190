//! The five-persona basic pipeline
//!
//! fundamental -> technical -> sentiment -> chief synthesis -> risk manager
//! -> validate -> seal. No debates, no memory. Serves two callers: the
//! direct `generate_memo` surface, and the advanced pipeline's fallback.

use super::validate::validate_memo;
use crate::error::{EngineError, Result};
use crate::extract;
use crate::market::{FundamentalSnapshot, SentimentSnapshot, TechnicalSnapshot};
use crate::memo::{ExtractedSignal, FeatureFlags, Memo, MemoStatus, PipelineMode, Recommendation};
use crate::personas::{
    ChiefStrategist, FundamentalAnalyst, PersonaClient, RiskManager, SentimentAnalyst,
    TechnicalAnalyst,
};
use chrono::Utc;
use memo_core::bundle::keys;
use memo_core::{ContextBundle, Persona};
use tracing::{info, instrument};

/// Confidence substituted on the enhanced surface when no pattern matched
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Position size substituted on the enhanced surface when no pattern matched
pub const DEFAULT_POSITION_SIZE: f64 = 5.0;

/// The basic deliberation path
pub struct BasicPipeline {
    fundamental: FundamentalAnalyst,
    technical: TechnicalAnalyst,
    sentiment: SentimentAnalyst,
    chief: ChiefStrategist,
    risk: RiskManager,
}

impl BasicPipeline {
    /// Create the basic pipeline over a shared persona client
    pub fn new(client: PersonaClient) -> Self {
        Self {
            fundamental: FundamentalAnalyst::new(client.clone()),
            technical: TechnicalAnalyst::new(client.clone()),
            sentiment: SentimentAnalyst::new(client.clone()),
            chief: ChiefStrategist::new(client.clone()),
            risk: RiskManager::new(client),
        }
    }

    /// Run the basic path and seal a memo
    ///
    /// Persona failures propagate as stage errors here; the caller decides
    /// whether that means degrading to an error memo (`generate_memo`) or
    /// surfacing a hard failure (the fallback's second failure).
    ///
    /// `mode` distinguishes a directly requested basic run from a fallback
    /// run: the fallback applies the enhanced surface's extraction defaults
    /// (confidence 0.7, position size 5.0), a direct run leaves unmatched
    /// fields unset.
    #[instrument(skip_all, fields(ticker = %ticker))]
    pub async fn run(
        &self,
        ticker: &str,
        fundamental: &FundamentalSnapshot,
        technical: &TechnicalSnapshot,
        sentiment: &SentimentSnapshot,
        mode: PipelineMode,
    ) -> Result<Memo> {
        let created_at = Utc::now();
        let base = ContextBundle::for_ticker(ticker);

        let fundamental_analysis = self
            .fundamental
            .analyze(&fundamental.extend_bundle(base.clone()))
            .await
            .map_err(|e| stage_error("fundamental_analysis", &e))?;

        let technical_analysis = self
            .technical
            .analyze(&technical.extend_bundle(base.clone()))
            .await
            .map_err(|e| stage_error("technical_analysis", &e))?;

        let sentiment_analysis = self
            .sentiment
            .analyze(&sentiment.extend_bundle(base.clone()))
            .await
            .map_err(|e| stage_error("sentiment_analysis", &e))?;

        // The accumulating deliberation state: every stage extends, none
        // mutates what an earlier stage wrote
        let analyses = base
            .with(keys::FUNDAMENTAL_ANALYSIS, fundamental_analysis.clone())
            .with(keys::TECHNICAL_ANALYSIS, technical_analysis.clone())
            .with(keys::SENTIMENT_ANALYSIS, sentiment_analysis.clone());

        let chief_analysis = self
            .chief
            .analyze(&analyses)
            .await
            .map_err(|e| stage_error("chief_strategist", &e))?;

        let risk_bundle = analyses.with(keys::CHIEF_ANALYSIS, chief_analysis.clone());
        let risk_assessment = self
            .risk
            .analyze(&risk_bundle)
            .await
            .map_err(|e| stage_error("risk_manager", &e))?;

        let mut confidence = extract::extract_confidence(&chief_analysis);
        let mut position_size = extract::extract_position_size(&risk_assessment);
        if mode == PipelineMode::BasicFallback {
            confidence = confidence.or(Some(DEFAULT_CONFIDENCE));
            position_size = position_size.or(Some(DEFAULT_POSITION_SIZE));
        }

        let score = extract::risk_score(&[&risk_assessment]);
        let signal = ExtractedSignal {
            recommendation: extract::extract_recommendation(&chief_analysis),
            confidence,
            position_size,
            risk_score: score,
            risk_category: extract::risk_category(score),
        };

        let mut memo = Memo {
            id: Memo::make_id(ticker, created_at),
            ticker: ticker.to_string(),
            created_at,
            fundamental_analysis,
            technical_analysis,
            sentiment_analysis,
            chief_analysis,
            risk_assessment,
            research_debate: None,
            risk_debate: None,
            signal,
            status: MemoStatus::Pending,
            error_reason: None,
            features: FeatureFlags::basic(mode),
            memory_stored: false,
        };

        memo.seal(validate_memo(&memo, technical));
        info!(memo_id = %memo.id, status = ?memo.status, "basic pipeline sealed memo");
        Ok(memo)
    }

    /// Build the always-returnable error memo for a failed basic run
    ///
    /// Every stage slot carries an inline error string so the memo keeps
    /// its shape; the memo is sealed as an error with the failure reason.
    pub fn degraded_memo(ticker: &str, cause: &EngineError, features: FeatureFlags) -> Memo {
        let created_at = Utc::now();
        let reason = cause.to_string();
        let slot = |stage: &str| format!("Error in {stage}: {reason}");

        Memo {
            id: Memo::make_id(ticker, created_at),
            ticker: ticker.to_string(),
            created_at,
            fundamental_analysis: slot("fundamental analysis"),
            technical_analysis: slot("technical analysis"),
            sentiment_analysis: slot("sentiment analysis"),
            chief_analysis: slot("chief strategist analysis"),
            risk_assessment: slot("risk assessment"),
            research_debate: None,
            risk_debate: None,
            signal: ExtractedSignal {
                recommendation: Recommendation::Hold,
                confidence: None,
                position_size: None,
                risk_score: 5.0,
                risk_category: extract::risk_category(5.0),
            },
            status: MemoStatus::Error,
            error_reason: Some(reason),
            features,
            memory_stored: false,
        }
    }
}

fn stage_error(stage: &str, err: &memo_core::Error) -> EngineError {
    EngineError::StageFailed {
        stage: stage.to_string(),
        reason: err.to_string(),
    }
}
