//! The full deliberation pipeline
//!
//! fundamental -> technical -> sentiment -> [research debate | disabled
//! stub] -> chief synthesis -> [risk debate | basic risk persona] -> memory
//! write -> validate -> seal. Stage order is fixed; the only branching is
//! the two feature toggles, each substitutable with a degraded default.

use super::basic::{DEFAULT_CONFIDENCE, DEFAULT_POSITION_SIZE};
use super::validate::validate_memo;
use crate::config::EngineConfig;
use crate::debate::{ResearchDebate, ResearchDebateReport, RiskDebate};
use crate::error::{EngineError, Result};
use crate::extract;
use crate::market::{FundamentalSnapshot, SentimentSnapshot, TechnicalSnapshot};
use crate::memo::{
    ExtractedSignal, FeatureFlags, Memo, MemoStatus, PipelineMode, Recommendation,
};
use crate::memory::{CandidateMemo, InsightMode, MemorySubsystem, SimilarityRecord};
use crate::personas::{
    ChiefStrategist, FundamentalAnalyst, PersonaClient, RiskManager, SentimentAnalyst,
    TechnicalAnalyst,
};
use chrono::Utc;
use memo_core::bundle::keys;
use memo_core::{ContextBundle, Persona};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

/// The advanced deliberation path
pub struct AdvancedPipeline {
    fundamental: FundamentalAnalyst,
    technical: TechnicalAnalyst,
    sentiment: SentimentAnalyst,
    chief: ChiefStrategist,
    basic_risk: RiskManager,
    research_debate: ResearchDebate,
    risk_debate: RiskDebate,
    memory: Option<Arc<MemorySubsystem>>,
    config: Arc<EngineConfig>,
}

impl AdvancedPipeline {
    /// Create the advanced pipeline
    ///
    /// `memory` is `None` when the memory feature is disabled; the pipeline
    /// then skips retrieval and the final write.
    pub fn new(
        client: PersonaClient,
        memory: Option<Arc<MemorySubsystem>>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            fundamental: FundamentalAnalyst::new(client.clone()),
            technical: TechnicalAnalyst::new(client.clone()),
            sentiment: SentimentAnalyst::new(client.clone()),
            chief: ChiefStrategist::new(client.clone()),
            basic_risk: RiskManager::new(client.clone()),
            research_debate: ResearchDebate::new(client.clone()),
            risk_debate: RiskDebate::new(client),
            memory,
            config,
        }
    }

    /// Run the advanced path and seal a memo
    ///
    /// Persona failures at top-level stages propagate out of here; the
    /// engine wrapper catches them and re-invokes the basic path. Failures
    /// inside debates never propagate (they degrade to inline error text in
    /// their slots).
    #[instrument(skip_all, fields(ticker = %ticker))]
    pub async fn run(
        &self,
        ticker: &str,
        fundamental: &FundamentalSnapshot,
        technical: &TechnicalSnapshot,
        sentiment: &SentimentSnapshot,
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

        let analyses = base
            .with(keys::FUNDAMENTAL_ANALYSIS, fundamental_analysis.clone())
            .with(keys::TECHNICAL_ANALYSIS, technical_analysis.clone())
            .with(keys::SENTIMENT_ANALYSIS, sentiment_analysis.clone());

        // Retrieval candidate for memory insights: the specialists' text
        // (the thesis does not exist yet at this point)
        let memory_context = match &self.memory {
            Some(memory) => {
                let candidate = CandidateMemo {
                    investment_thesis: format!(
                        "{fundamental_analysis} {technical_analysis} {sentiment_analysis}"
                    ),
                    risk_assessment: "Analysis in progress".to_string(),
                };
                let report = memory
                    .memory_insights(&candidate, &[InsightMode::General])
                    .await;
                report.insights.get(InsightMode::General.as_str()).cloned()
            }
            None => None,
        };

        let with_memory = |bundle: ContextBundle| match &memory_context {
            Some(context) => bundle.with_text(keys::MEMORY_CONTEXT, context.clone()),
            None => bundle,
        };

        // Research debate, or its disabled stub
        let research_report = if self.config.enable_research_debate {
            self.research_debate
                .conduct(&with_memory(analyses.clone()), self.config.research_rounds)
                .await
        } else {
            ResearchDebateReport::disabled()
        };

        // Chief synthesis over the analyses, the debate outcome and memory
        let chief_bundle = with_memory(
            analyses
                .clone()
                .with(keys::DEBATE_SYNTHESIS, research_report.debate_synthesis.clone()),
        );
        let chief_analysis = self
            .chief
            .analyze(&chief_bundle)
            .await
            .map_err(|e| stage_error("chief_strategist", &e))?;

        let recommendation = extract::extract_recommendation(&chief_analysis);
        let confidence =
            extract::extract_confidence(&chief_analysis).unwrap_or(DEFAULT_CONFIDENCE);

        // Risk stage: three-perspective debate, or the single risk persona
        let (risk_assessment, risk_debate_report, position_size, score) =
            if self.config.enable_risk_debate {
                let risk_bundle = with_memory(
                    ContextBundle::for_ticker(ticker)
                        .with(keys::INVESTMENT_THESIS, chief_analysis.clone())
                        .with(
                            keys::MARKET_CONDITIONS,
                            condensed_market_conditions(
                                &fundamental_analysis,
                                &technical_analysis,
                                &sentiment_analysis,
                            ),
                        )
                        .with(
                            keys::PROPOSED_POSITION,
                            json!({
                                "recommendation": recommendation.as_str(),
                                "confidence": confidence,
                                "size": DEFAULT_POSITION_SIZE,
                            }),
                        ),
                );
                let report = self
                    .risk_debate
                    .conduct(&risk_bundle, self.config.risk_rounds)
                    .await;
                let position = report.final_call.position_size;
                let score = report.final_call.risk_score;
                (report.risk_synthesis.clone(), Some(report), position, score)
            } else {
                let risk_bundle = analyses
                    .clone()
                    .with(keys::CHIEF_ANALYSIS, chief_analysis.clone());
                let assessment = self
                    .basic_risk
                    .analyze(&risk_bundle)
                    .await
                    .map_err(|e| stage_error("risk_manager", &e))?;
                let position = extract::extract_position_size(&assessment)
                    .unwrap_or(DEFAULT_POSITION_SIZE);
                let score = extract::risk_score(&[assessment.as_str()]);
                (assessment, None, position, score)
            };

        let signal = ExtractedSignal {
            recommendation,
            confidence: Some(confidence),
            position_size: Some(position_size),
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
            research_debate: Some(research_report),
            risk_debate: risk_debate_report,
            signal,
            status: MemoStatus::Pending,
            error_reason: None,
            features: FeatureFlags {
                research_debate_enabled: self.config.enable_research_debate,
                risk_debate_enabled: self.config.enable_risk_debate,
                memory_enabled: self.memory.is_some(),
                mode: PipelineMode::Advanced,
            },
            memory_stored: false,
        };

        // Memory write before sealing, mirroring the stage order; the
        // stored record carries the memo's thesis and risk text
        if let Some(memory) = &self.memory {
            memory.store().store(similarity_record(&memo, recommendation));
            memo.memory_stored = true;
        }

        memo.seal(validate_memo(&memo, technical));
        info!(memo_id = %memo.id, status = ?memo.status, "advanced pipeline sealed memo");
        Ok(memo)
    }
}

/// Specialist summaries condensed for the risk debate prompt
fn condensed_market_conditions(fundamental: &str, technical: &str, sentiment: &str) -> String {
    format!(
        "Fundamental: {}... Technical: {}... Sentiment: {}...",
        truncate_chars(fundamental, 500),
        truncate_chars(technical, 500),
        truncate_chars(sentiment, 500),
    )
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn similarity_record(memo: &Memo, recommendation: Recommendation) -> SimilarityRecord {
    SimilarityRecord {
        memo_id: memo.id.clone(),
        ticker: memo.ticker.clone(),
        investment_thesis: memo.chief_analysis.clone(),
        risk_assessment: memo.risk_assessment.clone(),
        decision: recommendation.as_str().to_string(),
        outcome: None,
        outcome_date: None,
        performance_metrics: std::collections::BTreeMap::new(),
        tags: vec!["enhanced_analysis".to_string(), memo.ticker.clone()],
        created_at: memo.created_at,
    }
}

fn stage_error(stage: &str, err: &memo_core::Error) -> EngineError {
    EngineError::StageFailed {
        stage: stage.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
    }

    #[test]
    fn test_condensed_market_conditions_shape() {
        let out = condensed_market_conditions("f", "t", "s");
        assert_eq!(out, "Fundamental: f... Technical: t... Sentiment: s...");
    }
}
