//! Insight synthesis over retrieved precedents

use super::store::{MemoryStore, Outcome, SimilarMemo, SimilarityRecord};
use crate::config::EngineConfig;
use crate::personas::{MemoryAnalyst, PersonaClient};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// How retrieved precedents are analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightMode {
    PatternAnalysis,
    OutcomeAnalysis,
    ImprovementSuggestions,
    General,
}

impl InsightMode {
    /// Key used in insight reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatternAnalysis => "pattern_analysis",
            Self::OutcomeAnalysis => "outcome_analysis",
            Self::ImprovementSuggestions => "improvement_suggestions",
            Self::General => "general",
        }
    }

    /// Fixed short-circuit text when retrieval found nothing
    fn empty_text(&self) -> &'static str {
        match self {
            Self::PatternAnalysis => "No similar historical memos found for pattern analysis.",
            Self::OutcomeAnalysis => "No similar historical memos found for outcome analysis.",
            Self::ImprovementSuggestions => {
                "No similar historical memos found for improvement suggestions."
            }
            Self::General => "No similar historical memos found for analysis.",
        }
    }
}

/// The not-yet-sealed memo text used as the retrieval candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMemo {
    pub investment_thesis: String,
    pub risk_assessment: String,
}

impl CandidateMemo {
    /// The candidate's retrieval text
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.investment_thesis, self.risk_assessment)
    }
}

/// Insight texts per requested mode, plus retrieval metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    /// Mode key to generated guidance text
    pub insights: BTreeMap<String, String>,
    pub similar_memos_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// High-level learning summary over recent labelled history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningInsights {
    pub learning_insights: String,
    pub total_analyzed: usize,
    pub successful_cases: usize,
    pub failed_cases: usize,
    pub success_rate: f64,
}

/// Memory subsystem: store + retrieval + insight persona
///
/// Consulted from several pipeline points (read before synthesis, write
/// after validation), which makes it the only component with read/write
/// fan-in across stages.
pub struct MemorySubsystem {
    store: Arc<MemoryStore>,
    analyst: MemoryAnalyst,
    config: Arc<EngineConfig>,
}

impl MemorySubsystem {
    /// Create a subsystem over a fresh store
    pub fn new(client: PersonaClient, config: Arc<EngineConfig>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), client, config)
    }

    /// Create a subsystem over an existing store
    pub fn with_store(
        store: Arc<MemoryStore>,
        client: PersonaClient,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            store,
            analyst: MemoryAnalyst::new(client),
            config,
        }
    }

    /// The backing store
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Retrieve similar precedents for a candidate using configured limits
    pub fn find_similar(&self, candidate: &CandidateMemo) -> Vec<SimilarMemo> {
        self.store.find_similar(
            &candidate.similarity_text(),
            self.config.retrieval_limit,
            self.config.min_similarity,
        )
    }

    /// Generate insight text for each requested mode
    ///
    /// Retrieval runs once; each mode renders its own prompt over the same
    /// hits. With no hits the fixed per-mode text is returned without a
    /// provider call. A generation failure degrades that mode's text to an
    /// inline error string; insights never fail the pipeline.
    pub async fn memory_insights(
        &self,
        candidate: &CandidateMemo,
        modes: &[InsightMode],
    ) -> InsightReport {
        let similar = self.find_similar(candidate);
        debug!(hits = similar.len(), "memory retrieval for insights");

        let mut insights = BTreeMap::new();
        for mode in modes {
            let text = if similar.is_empty() {
                mode.empty_text().to_string()
            } else {
                match self.insight_for_mode(*mode, candidate, &similar).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(mode = mode.as_str(), error = %e, "insight generation failed");
                        format!("Error in MemoryAnalyst: {e}")
                    }
                }
            };
            insights.insert(mode.as_str().to_string(), text);
        }

        InsightReport {
            insights,
            similar_memos_count: similar.len(),
            generated_at: Utc::now(),
        }
    }

    async fn insight_for_mode(
        &self,
        mode: InsightMode,
        candidate: &CandidateMemo,
        similar: &[SimilarMemo],
    ) -> memo_core::Result<String> {
        let current = serde_json::to_string_pretty(candidate)
            .map_err(|e| memo_core::Error::ProcessingFailed(e.to_string()))?;
        let records: Vec<&SimilarityRecord> = similar.iter().map(|s| &s.record).collect();
        let history = serde_json::to_string_pretty(&records)
            .map_err(|e| memo_core::Error::ProcessingFailed(e.to_string()))?;

        let prompt = match mode {
            InsightMode::PatternAnalysis => format!(
                "Analyze patterns in the following similar historical memos:\n\n\
                 Current Memo: {current}\n\n\
                 Similar Historical Memos:\n{history}\n\n\
                 Identify:\n\
                 1. Common themes and patterns across similar situations\n\
                 2. Recurring factors that led to success or failure\n\
                 3. Market conditions that influenced outcomes\n\
                 4. Decision-making patterns that worked well\n\
                 5. Warning signs or red flags that appeared in failed cases\n\n\
                 Provide specific insights that can inform the current decision."
            ),
            InsightMode::OutcomeAnalysis => {
                let successful: Vec<&&SimilarityRecord> = records
                    .iter()
                    .filter(|r| r.outcome == Some(Outcome::Success))
                    .collect();
                let failed: Vec<&&SimilarityRecord> = records
                    .iter()
                    .filter(|r| r.outcome == Some(Outcome::Failure))
                    .collect();
                let success_rate = successful.len() as f64 / records.len() as f64;
                let successful_json = serde_json::to_string_pretty(&successful)
                    .map_err(|e| memo_core::Error::ProcessingFailed(e.to_string()))?;
                let failed_json = serde_json::to_string_pretty(&failed)
                    .map_err(|e| memo_core::Error::ProcessingFailed(e.to_string()))?;
                format!(
                    "Analyze outcomes of similar historical decisions:\n\n\
                     Current Memo: {current}\n\n\
                     Historical Outcomes:\n\
                     - Total Similar Cases: {}\n\
                     - Successful: {} ({:.1}%)\n\
                     - Failed: {}\n\n\
                     Successful Cases: {successful_json}\n\
                     Failed Cases: {failed_json}\n\n\
                     Provide:\n\
                     1. Key factors that differentiated successful from failed cases\n\
                     2. Common characteristics of successful decisions\n\
                     3. Warning signs that appeared in failed cases\n\
                     4. Recommendations based on historical success patterns\n\
                     5. Risk factors to monitor based on failed cases",
                    records.len(),
                    successful.len(),
                    success_rate * 100.0,
                    failed.len(),
                )
            }
            InsightMode::ImprovementSuggestions => format!(
                "Suggest improvements for the current memo based on historical performance:\n\n\
                 Current Memo: {current}\n\n\
                 Historical Performance:\n{history}\n\n\
                 Provide specific suggestions for:\n\
                 1. Improving the investment thesis based on historical patterns\n\
                 2. Adjusting position sizing based on past outcomes\n\
                 3. Adding risk management measures that worked in similar cases\n\
                 4. Monitoring factors that were important in historical decisions\n\
                 5. Avoiding mistakes that led to failures in similar situations\n\
                 6. Leveraging successful strategies from past decisions\n\n\
                 Focus on actionable, specific improvements."
            ),
            InsightMode::General => format!(
                "Provide a comprehensive analysis of historical context for the current decision:\n\n\
                 Current Memo: {current}\n\n\
                 Similar Historical Memos:\n{history}\n\n\
                 Provide insights on:\n\
                 1. How this situation compares to historical precedents\n\
                 2. What we can learn from similar past decisions\n\
                 3. Key differences that might affect the outcome\n\
                 4. Historical success factors that apply here\n\
                 5. Risk factors that emerged in similar situations\n\
                 6. Recommendations based on historical patterns\n\n\
                 Structure your response with clear sections and actionable insights."
            ),
        };

        self.analyst.generate(&prompt).await
    }

    /// High-level learning insights over the last 50 labelled records
    pub async fn learning_insights(&self) -> LearningInsights {
        let recent = self.store.labelled_recent(50);
        let successful = recent
            .iter()
            .filter(|r| r.outcome == Some(Outcome::Success))
            .count();
        let failed = recent
            .iter()
            .filter(|r| r.outcome == Some(Outcome::Failure))
            .count();

        if recent.is_empty() {
            return LearningInsights {
                learning_insights: "No historical data available for learning insights".to_string(),
                total_analyzed: 0,
                successful_cases: 0,
                failed_cases: 0,
                success_rate: 0.0,
            };
        }

        let history = serde_json::to_string_pretty(&recent).unwrap_or_default();
        let prompt = format!(
            "Review the recent labelled decision history below and extract the \
             highest-level lessons: what kinds of theses succeeded, what kinds \
             failed, and what should change going forward.\n\n{history}\n\n\
             Structure your response with clear sections and actionable insights."
        );
        let learning_insights = self
            .analyst
            .generate(&prompt)
            .await
            .unwrap_or_else(|e| format!("Error in MemoryAnalyst: {e}"));

        LearningInsights {
            learning_insights,
            total_analyzed: recent.len(),
            successful_cases: successful,
            failed_cases: failed,
            success_rate: successful as f64 / recent.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use memo_llm::{
        CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn complete(&self, request: CompletionRequest) -> memo_llm::Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let prompt = request
                .messages
                .first()
                .map(|m| m.text().to_string())
                .unwrap_or_default();
            Ok(CompletionResponse {
                message: Message::assistant(format!("insight over: {prompt}")),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn subsystem() -> (MemorySubsystem, Arc<EchoProvider>) {
        let provider = Arc::new(EchoProvider {
            calls: AtomicUsize::new(0),
        });
        let config = Arc::new(EngineConfig::default());
        let client = PersonaClient::new(provider.clone(), config.clone());
        (MemorySubsystem::new(client, config), provider)
    }

    fn labelled_record(id: &str, thesis: &str, outcome: Outcome) -> SimilarityRecord {
        SimilarityRecord {
            memo_id: id.to_string(),
            ticker: "AAPL".to_string(),
            investment_thesis: thesis.to_string(),
            risk_assessment: "volatility is manageable".to_string(),
            decision: "Buy".to_string(),
            outcome: Some(outcome),
            outcome_date: Some(Utc::now()),
            performance_metrics: BTreeMap::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_short_circuits_without_provider_call() {
        let (subsystem, provider) = subsystem();
        let candidate = CandidateMemo {
            investment_thesis: "cloud growth".to_string(),
            risk_assessment: "limited".to_string(),
        };

        let report = subsystem
            .memory_insights(&candidate, &[InsightMode::General, InsightMode::PatternAnalysis])
            .await;

        assert_eq!(report.similar_memos_count, 0);
        assert_eq!(
            report.insights["general"],
            "No similar historical memos found for analysis."
        );
        assert_eq!(
            report.insights["pattern_analysis"],
            "No similar historical memos found for pattern analysis."
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insights_generated_when_hits_exist() {
        let (subsystem, provider) = subsystem();
        subsystem.store().store(labelled_record(
            "m1",
            "cloud growth accelerating with strong margins",
            Outcome::Success,
        ));

        let candidate = CandidateMemo {
            investment_thesis: "cloud growth accelerating with strong margins".to_string(),
            risk_assessment: "volatility is manageable".to_string(),
        };

        let report = subsystem
            .memory_insights(&candidate, &[InsightMode::General])
            .await;

        assert_eq!(report.similar_memos_count, 1);
        assert!(report.insights["general"].starts_with("insight over:"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_learning_insights_summary() {
        let (subsystem, _provider) = subsystem();
        subsystem
            .store()
            .store(labelled_record("m1", "thesis one", Outcome::Success));
        subsystem
            .store()
            .store(labelled_record("m2", "thesis two", Outcome::Failure));

        let insights = subsystem.learning_insights().await;
        assert_eq!(insights.total_analyzed, 2);
        assert_eq!(insights.successful_cases, 1);
        assert_eq!(insights.failed_cases, 1);
        assert!((insights.success_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_learning_insights_empty() {
        let (subsystem, provider) = subsystem();
        let insights = subsystem.learning_insights().await;
        assert_eq!(insights.total_analyzed, 0);
        assert!(insights.learning_insights.contains("No historical data"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
