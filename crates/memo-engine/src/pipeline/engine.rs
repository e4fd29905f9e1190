//! The two-tier deliberation engine
//!
//! `AdvancedPipeline` and `BasicPipeline` both produce a sealed memo; the
//! engine selects between them, catching advanced-path failures and
//! re-invoking the basic path once. Callers always receive a memo-shaped
//! result except when the fallback itself fails, the single propagating
//! case.

use super::advanced::AdvancedPipeline;
use super::basic::BasicPipeline;
use crate::config::EngineConfig;
use crate::debate::{ResearchDebate, ResearchDebateReport, RiskDebate, RiskDebateReport};
use crate::error::{EngineError, Result};
use crate::market::{FundamentalSnapshot, SentimentSnapshot, TechnicalSnapshot};
use crate::memo::{FeatureFlags, Memo, PipelineMode};
use crate::memory::{
    CandidateMemo, LearningInsights, MemorySubsystem, Outcome, PerformanceAnalytics, SimilarMemo,
    TimeWindow, performance_analytics,
};
use crate::personas::PersonaClient;
use memo_llm::LLMProvider;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Top-level deliberation surface
///
/// One engine serves many deliberations; the only state shared between
/// them is the append-only memory store.
pub struct DeliberationEngine {
    advanced: AdvancedPipeline,
    basic: BasicPipeline,
    research_debate: ResearchDebate,
    risk_debate: RiskDebate,
    memory: Option<Arc<MemorySubsystem>>,
    config: Arc<EngineConfig>,
}

impl DeliberationEngine {
    /// Create an engine over a provider with the given configuration
    pub fn new(provider: Arc<dyn LLMProvider>, config: EngineConfig) -> Self {
        let config = Arc::new(config);
        let client = PersonaClient::new(provider, Arc::clone(&config));

        let memory = config
            .enable_memory
            .then(|| Arc::new(MemorySubsystem::new(client.clone(), Arc::clone(&config))));

        Self {
            advanced: AdvancedPipeline::new(
                client.clone(),
                memory.clone(),
                Arc::clone(&config),
            ),
            basic: BasicPipeline::new(client.clone()),
            research_debate: ResearchDebate::new(client.clone()),
            risk_debate: RiskDebate::new(client),
            memory,
            config,
        }
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The memory subsystem, when enabled
    pub fn memory(&self) -> Option<&MemorySubsystem> {
        self.memory.as_deref()
    }

    /// Generate a memo through the basic five-persona path
    ///
    /// Never fails: a persona failure degrades to an error memo whose
    /// stage slots carry inline error text.
    pub async fn generate_memo(
        &self,
        ticker: &str,
        fundamental: &FundamentalSnapshot,
        technical: &TechnicalSnapshot,
        sentiment: &SentimentSnapshot,
    ) -> Memo {
        match self
            .basic
            .run(ticker, fundamental, technical, sentiment, PipelineMode::Basic)
            .await
        {
            Ok(memo) => memo,
            Err(e) => {
                warn!(ticker, error = %e, "basic pipeline failed, returning degraded memo");
                BasicPipeline::degraded_memo(
                    ticker,
                    &e,
                    FeatureFlags::basic(PipelineMode::Basic),
                )
            }
        }
    }

    /// Generate a memo through the advanced path with fallback
    ///
    /// On advanced-path failure the basic path re-runs the five core
    /// personas (no debate, no memory) and the memo records the fallback
    /// mode. Only a second failure surfaces as an error.
    pub async fn generate_enhanced_memo(
        &self,
        ticker: &str,
        fundamental: &FundamentalSnapshot,
        technical: &TechnicalSnapshot,
        sentiment: &SentimentSnapshot,
    ) -> Result<Memo> {
        info!(
            ticker,
            research = self.config.enable_research_debate,
            risk = self.config.enable_risk_debate,
            memory = self.config.enable_memory,
            "starting enhanced deliberation"
        );

        match self
            .advanced
            .run(ticker, fundamental, technical, sentiment)
            .await
        {
            Ok(memo) => Ok(memo),
            Err(advanced_err) => {
                warn!(ticker, error = %advanced_err, "advanced path failed, falling back");
                self.basic
                    .run(
                        ticker,
                        fundamental,
                        technical,
                        sentiment,
                        PipelineMode::BasicFallback,
                    )
                    .await
                    .map_err(|fallback_err| {
                        EngineError::FallbackFailed(format!(
                            "{fallback_err} (advanced path: {advanced_err})"
                        ))
                    })
            }
        }
    }

    /// Run a standalone research debate over a caller-supplied context
    pub async fn conduct_research_debate(
        &self,
        context: &memo_core::ContextBundle,
        rounds: usize,
    ) -> ResearchDebateReport {
        self.research_debate.conduct(context, rounds).await
    }

    /// Run a standalone risk debate over a caller-supplied context
    pub async fn conduct_risk_debate(
        &self,
        context: &memo_core::ContextBundle,
        rounds: usize,
    ) -> RiskDebateReport {
        self.risk_debate.conduct(context, rounds).await
    }

    /// Retrieve similar historical memos for a candidate
    ///
    /// Empty when memory is disabled.
    pub fn find_similar(
        &self,
        candidate: &CandidateMemo,
        limit: usize,
        min_similarity: f64,
    ) -> Vec<SimilarMemo> {
        match &self.memory {
            Some(memory) => {
                memory
                    .store()
                    .find_similar(&candidate.similarity_text(), limit, min_similarity)
            }
            None => Vec::new(),
        }
    }

    /// Attach a labelled outcome to a stored memo
    ///
    /// Returns false when memory is disabled or the id is unknown.
    pub fn attach_outcome(
        &self,
        memo_id: &str,
        outcome: Outcome,
        performance_metrics: BTreeMap<String, f64>,
    ) -> bool {
        match &self.memory {
            Some(memory) => memory
                .store()
                .attach_outcome(memo_id, outcome, performance_metrics),
            None => false,
        }
    }

    /// Outcome analytics over a ticker/time window
    pub fn performance_analytics(
        &self,
        ticker: Option<&str>,
        window: TimeWindow,
    ) -> PerformanceAnalytics {
        match &self.memory {
            Some(memory) => performance_analytics(memory.store(), ticker, window),
            None => PerformanceAnalytics::default(),
        }
    }

    /// High-level learning insights over recent labelled history
    pub async fn learning_insights(&self) -> Option<LearningInsights> {
        match &self.memory {
            Some(memory) => Some(memory.learning_insights().await),
            None => None,
        }
    }
}
