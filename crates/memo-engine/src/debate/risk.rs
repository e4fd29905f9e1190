//! Conservative/aggressive/neutral risk debate

use super::{DebateRound, RoundEntry, degraded};
use crate::extract;
use crate::memo::RiskCategory;
use crate::personas::{
    AggressiveRiskAnalyst, ConservativeRiskAnalyst, NeutralRiskAnalyst, PersonaClient,
    RiskDirector,
};
use memo_core::bundle::keys;
use memo_core::{ContextBundle, Persona};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default position size when no analyst produced one
pub const DEFAULT_POSITION_SIZE: f64 = 5.0;

/// Position-size recommendations per perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecommendations {
    pub conservative: Option<f64>,
    pub aggressive: Option<f64>,
    pub neutral: Option<f64>,
    /// The size carried forward: the neutral analyst's, or 5.0
    pub recommended: f64,
}

/// Confidence levels per perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceLevels {
    pub conservative: Option<f64>,
    pub aggressive: Option<f64>,
    pub neutral: Option<f64>,
    /// Mean of the three, when all three were extracted
    pub average: Option<f64>,
}

/// Quantitative metrics recovered from the risk debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub position_sizes: PositionRecommendations,
    pub confidence_levels: ConfidenceLevels,
    /// 1-10 keyword-heuristic score over all three analyses
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub key_risk_factors: Vec<String>,
}

/// The debate's closing recommendation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRiskCall {
    /// Action guidance by risk band
    pub recommendation: String,
    pub position_size: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    /// Top risk factors (at most 3)
    pub key_considerations: Vec<String>,
    /// Monitoring cadence by risk band
    pub monitoring_requirements: Vec<String>,
}

/// Outcome of a risk debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDebateReport {
    /// Conservative analysis from the final round
    pub conservative_analysis: String,
    /// Aggressive analysis from the final round
    pub aggressive_analysis: String,
    /// Neutral analysis from the final round
    pub neutral_analysis: String,
    /// Balanced narrative produced by the synthesizer
    pub risk_synthesis: String,
    /// Full append-only round history
    pub history: Vec<DebateRound>,
    pub metrics: RiskMetrics,
    pub final_call: FinalRiskCall,
}

/// Runs the structured three-way risk debate
pub struct RiskDebate {
    conservative: ConservativeRiskAnalyst,
    aggressive: AggressiveRiskAnalyst,
    neutral: NeutralRiskAnalyst,
    director: RiskDirector,
}

impl RiskDebate {
    /// Create a new risk debate over a shared persona client
    pub fn new(client: PersonaClient) -> Self {
        Self {
            conservative: ConservativeRiskAnalyst::new(client.clone()),
            aggressive: AggressiveRiskAnalyst::new(client.clone()),
            neutral: NeutralRiskAnalyst::new(client.clone()),
            director: RiskDirector::new(client),
        }
    }

    /// Conduct the debate for the given number of rounds
    ///
    /// Same round contract as the research debate: round k>0 hands each
    /// analyst the other two analysts' round k-1 outputs, never older ones.
    pub async fn conduct(&self, context: &ContextBundle, rounds: usize) -> RiskDebateReport {
        let ticker = context.ticker().unwrap_or_default().to_string();
        info!(ticker, rounds, "starting risk debate");

        let mut history: Vec<DebateRound> = Vec::with_capacity(rounds);
        let mut conservative_args = String::new();
        let mut aggressive_args = String::new();
        let mut neutral_args = String::new();

        for round in 0..rounds {
            let (con_bundle, agg_bundle, neu_bundle) = if round == 0 {
                (context.clone(), context.clone(), context.clone())
            } else {
                (
                    context
                        .clone()
                        .with_text(keys::AGGRESSIVE_ARGUMENTS, aggressive_args.clone())
                        .with_text(keys::NEUTRAL_ARGUMENTS, neutral_args.clone()),
                    context
                        .clone()
                        .with_text(keys::CONSERVATIVE_ARGUMENTS, conservative_args.clone())
                        .with_text(keys::NEUTRAL_ARGUMENTS, neutral_args.clone()),
                    context
                        .clone()
                        .with_text(keys::CONSERVATIVE_ARGUMENTS, conservative_args.clone())
                        .with_text(keys::AGGRESSIVE_ARGUMENTS, aggressive_args.clone()),
                )
            };

            let (con_result, agg_result, neu_result) = tokio::join!(
                self.conservative.analyze(&con_bundle),
                self.aggressive.analyze(&agg_bundle),
                self.neutral.analyze(&neu_bundle),
            );

            conservative_args =
                con_result.unwrap_or_else(|e| degraded(self.conservative.name(), &e));
            aggressive_args = agg_result.unwrap_or_else(|e| degraded(self.aggressive.name(), &e));
            neutral_args = neu_result.unwrap_or_else(|e| degraded(self.neutral.name(), &e));

            history.push(DebateRound {
                index: round,
                entries: vec![
                    RoundEntry {
                        side: "Conservative".to_string(),
                        analysis: conservative_args.clone(),
                    },
                    RoundEntry {
                        side: "Aggressive".to_string(),
                        analysis: aggressive_args.clone(),
                    },
                    RoundEntry {
                        side: "Neutral".to_string(),
                        analysis: neutral_args.clone(),
                    },
                ],
            });
        }

        let risk_synthesis = self
            .director
            .synthesize(&ticker, &conservative_args, &aggressive_args, &neutral_args)
            .await
            .unwrap_or_else(|e| degraded("RiskDirector", &e));

        let metrics = compute_metrics(&conservative_args, &aggressive_args, &neutral_args);
        let final_call = final_call(&metrics);

        RiskDebateReport {
            conservative_analysis: conservative_args,
            aggressive_analysis: aggressive_args,
            neutral_analysis: neutral_args,
            risk_synthesis,
            history,
            metrics,
            final_call,
        }
    }
}

/// Recover the quantitative metrics from the three final analyses
fn compute_metrics(conservative: &str, aggressive: &str, neutral: &str) -> RiskMetrics {
    let con_size = extract::extract_position_size(conservative);
    let agg_size = extract::extract_position_size(aggressive);
    let neu_size = extract::extract_position_size(neutral);

    let con_conf = extract::extract_confidence(conservative);
    let agg_conf = extract::extract_confidence(aggressive);
    let neu_conf = extract::extract_confidence(neutral);

    let average = match (con_conf, agg_conf, neu_conf) {
        (Some(c), Some(a), Some(n)) => Some((c + a + n) / 3.0),
        _ => None,
    };

    let score = extract::risk_score(&[conservative, aggressive, neutral]);

    RiskMetrics {
        position_sizes: PositionRecommendations {
            conservative: con_size,
            aggressive: agg_size,
            neutral: neu_size,
            recommended: neu_size.unwrap_or(DEFAULT_POSITION_SIZE),
        },
        confidence_levels: ConfidenceLevels {
            conservative: con_conf,
            aggressive: agg_conf,
            neutral: neu_conf,
            average,
        },
        risk_score: score,
        risk_category: RiskCategory::from_score(score),
        key_risk_factors: extract::extract_risk_factors(&[conservative, aggressive, neutral]),
    }
}

/// Close the debate with an action recommendation by risk band
fn final_call(metrics: &RiskMetrics) -> FinalRiskCall {
    let recommendation = if metrics.risk_score <= 3.0 {
        "Proceed with position - Low risk profile"
    } else if metrics.risk_score <= 6.0 {
        "Proceed with caution - Monitor closely"
    } else {
        "Consider reducing position size or hedging"
    };

    FinalRiskCall {
        recommendation: recommendation.to_string(),
        position_size: metrics.position_sizes.recommended,
        risk_score: metrics.risk_score,
        risk_category: metrics.risk_category,
        key_considerations: metrics.key_risk_factors.iter().take(3).cloned().collect(),
        monitoring_requirements: monitoring_requirements(metrics.risk_score),
    }
}

/// Monitoring cadence appropriate for a risk score
fn monitoring_requirements(risk_score: f64) -> Vec<String> {
    let requirements: &[&str] = if risk_score <= 3.0 {
        &["Weekly portfolio review", "Monthly position assessment"]
    } else if risk_score <= 6.0 {
        &[
            "Daily market monitoring",
            "Weekly position review",
            "Set stop-loss levels",
        ]
    } else {
        &[
            "Daily position monitoring",
            "Real-time alerts",
            "Frequent rebalancing",
            "Hedge monitoring",
        ]
    };
    requirements.iter().map(|r| (*r).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use async_trait::async_trait;
    use memo_llm::{
        CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
    };
    use std::sync::Arc;

    /// Provider that answers each risk persona with a canned analysis
    struct CannedProvider;

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn complete(&self, request: CompletionRequest) -> memo_llm::Result<CompletionResponse> {
            let system = request.system.as_deref().unwrap_or_default();
            let text = if system.contains("Conservative Risk Analyst") {
                "Volatile conditions warrant care. Recommend 2% position with 60% confidence."
            } else if system.contains("Aggressive Risk Analyst") {
                "Asymmetric upside. Take an 8% position, 80% confidence."
            } else if system.contains("Neutral Risk Analyst") {
                "Balanced view: 4% position size is stable and safe, 70% confidence."
            } else {
                "Synthesis: size prudently."
            };
            Ok(CompletionResponse {
                message: Message::assistant(text),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn risk_debate() -> RiskDebate {
        let client = PersonaClient::new(Arc::new(CannedProvider), Arc::new(EngineConfig::default()));
        RiskDebate::new(client)
    }

    #[tokio::test]
    async fn test_metrics_extracted_per_perspective() {
        let report = risk_debate()
            .conduct(&ContextBundle::for_ticker("TSLA"), 2)
            .await;

        assert_eq!(report.metrics.position_sizes.conservative, Some(2.0));
        assert_eq!(report.metrics.position_sizes.aggressive, Some(8.0));
        assert_eq!(report.metrics.position_sizes.neutral, Some(4.0));
        // The neutral analyst anchors the recommended size
        assert!((report.metrics.position_sizes.recommended - 4.0).abs() < f64::EPSILON);

        assert_eq!(report.metrics.confidence_levels.conservative, Some(0.6));
        assert_eq!(report.metrics.confidence_levels.aggressive, Some(0.8));
        assert_eq!(report.metrics.confidence_levels.neutral, Some(0.7));
        let average = report
            .metrics
            .confidence_levels
            .average
            .expect("all three extracted");
        assert!((average - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_history_has_three_entries_per_round() {
        let report = risk_debate()
            .conduct(&ContextBundle::for_ticker("TSLA"), 2)
            .await;
        assert_eq!(report.history.len(), 2);
        for round in &report.history {
            assert_eq!(round.entries.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_final_call_bands() {
        let report = risk_debate()
            .conduct(&ContextBundle::for_ticker("TSLA"), 1)
            .await;
        // Conservative text tallies risk words, neutral tallies "stable";
        // the score lands mid-band
        assert_eq!(report.final_call.risk_category, RiskCategory::Medium);
        assert!(report.final_call.recommendation.contains("caution"));
        assert!(
            report
                .final_call
                .monitoring_requirements
                .contains(&"Set stop-loss levels".to_string())
        );
    }

    #[test]
    fn test_monitoring_bands() {
        assert_eq!(monitoring_requirements(2.0).len(), 2);
        assert_eq!(monitoring_requirements(5.0).len(), 3);
        assert_eq!(monitoring_requirements(9.0).len(), 4);
    }
}
