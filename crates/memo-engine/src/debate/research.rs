//! Bull/bear research debate

use super::{DebateRound, RoundEntry, degraded};
use crate::extract;
use crate::personas::{BearResearcher, BullResearcher, PersonaClient, ResearchDirector};
use memo_core::bundle::keys;
use memo_core::{ContextBundle, Persona};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Key points pulled from the final bull and bear arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoints {
    /// Top bullet points from the bull side (at most 5)
    pub bull_key_points: Vec<String>,
    /// Top bullet points from the bear side (at most 5)
    pub bear_key_points: Vec<String>,
    /// Consensus vocabulary present on both sides
    pub consensus_areas: Vec<String>,
}

/// Outcome of a research debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchDebateReport {
    /// Bull argument from the final round
    pub bull_analysis: String,
    /// Bear argument from the final round
    pub bear_analysis: String,
    /// Balanced narrative produced by the synthesizer
    pub debate_synthesis: String,
    /// Full append-only round history
    pub history: Vec<DebateRound>,
    /// Key points and consensus areas
    pub key_points: KeyPoints,
}

impl ResearchDebateReport {
    /// Placeholder report used when the research debate stage is disabled
    pub fn disabled() -> Self {
        const DISABLED: &str = "Research debate disabled";
        Self {
            bull_analysis: DISABLED.to_string(),
            bear_analysis: DISABLED.to_string(),
            debate_synthesis: DISABLED.to_string(),
            history: Vec::new(),
            key_points: KeyPoints {
                bull_key_points: Vec::new(),
                bear_key_points: Vec::new(),
                consensus_areas: Vec::new(),
            },
        }
    }
}

/// Runs the structured bull/bear debate
pub struct ResearchDebate {
    bull: BullResearcher,
    bear: BearResearcher,
    director: ResearchDirector,
}

impl ResearchDebate {
    /// Create a new research debate over a shared persona client
    pub fn new(client: PersonaClient) -> Self {
        Self {
            bull: BullResearcher::new(client.clone()),
            bear: BearResearcher::new(client.clone()),
            director: ResearchDirector::new(client),
        }
    }

    /// Conduct the debate for the given number of rounds
    ///
    /// The shared bundle is never mutated: each round derives per-persona
    /// bundles from it, carrying only the counterpart's previous-round
    /// output. That keeps context size bounded and guarantees a persona
    /// never sees arguments older than one round.
    pub async fn conduct(&self, context: &ContextBundle, rounds: usize) -> ResearchDebateReport {
        let ticker = context.ticker().unwrap_or_default().to_string();
        info!(ticker, rounds, "starting research debate");

        let mut history: Vec<DebateRound> = Vec::with_capacity(rounds);
        let mut bull_arguments = String::new();
        let mut bear_arguments = String::new();

        for round in 0..rounds {
            let (bull_bundle, bear_bundle) = if round == 0 {
                (context.clone(), context.clone())
            } else {
                (
                    context
                        .clone()
                        .with_text(keys::BEAR_ARGUMENTS, bear_arguments.clone()),
                    context
                        .clone()
                        .with_text(keys::BULL_ARGUMENTS, bull_arguments.clone()),
                )
            };

            let (bull_result, bear_result) = tokio::join!(
                self.bull.analyze(&bull_bundle),
                self.bear.analyze(&bear_bundle),
            );

            bull_arguments =
                bull_result.unwrap_or_else(|e| degraded(self.bull.name(), &e));
            bear_arguments =
                bear_result.unwrap_or_else(|e| degraded(self.bear.name(), &e));

            history.push(DebateRound {
                index: round,
                entries: vec![
                    RoundEntry {
                        side: "Bull".to_string(),
                        analysis: bull_arguments.clone(),
                    },
                    RoundEntry {
                        side: "Bear".to_string(),
                        analysis: bear_arguments.clone(),
                    },
                ],
            });
        }

        let debate_synthesis = self
            .director
            .synthesize(&ticker, &bull_arguments, &bear_arguments)
            .await
            .unwrap_or_else(|e| degraded("ResearchDirector", &e));

        let key_points = KeyPoints {
            bull_key_points: top_points(&bull_arguments),
            bear_key_points: top_points(&bear_arguments),
            consensus_areas: extract::find_consensus_areas(&bull_arguments, &bear_arguments),
        };

        ResearchDebateReport {
            bull_analysis: bull_arguments,
            bear_analysis: bear_arguments,
            debate_synthesis,
            history,
            key_points,
        }
    }
}

/// Top five bullet-like lines from one side's final argument
fn top_points(text: &str) -> Vec<String> {
    let mut points = extract::extract_bullet_points(text);
    points.truncate(5);
    points
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
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that labels every reply with its persona role and a call
    /// counter, so tests can assert which arguments reached which round.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    fn role_tag(system: &str) -> &'static str {
        if system.contains("Bull Research Analyst") {
            "BULL"
        } else if system.contains("Bear Research Analyst") {
            "BEAR"
        } else {
            "DIRECTOR"
        }
    }

    #[async_trait]
    impl LLMProvider for CountingProvider {
        async fn complete(&self, request: CompletionRequest) -> memo_llm::Result<CompletionResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let tag = role_tag(request.system.as_deref().unwrap_or_default());
            let prompt = request
                .messages
                .first()
                .map(|m| m.text().to_string())
                .unwrap_or_default();
            Ok(CompletionResponse {
                message: Message::assistant(format!("{tag}-{call} saw [{prompt}]")),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn debate_with_counting() -> ResearchDebate {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let client = PersonaClient::new(provider, Arc::new(EngineConfig::default()));
        ResearchDebate::new(client)
    }

    #[tokio::test]
    async fn test_round_zero_sees_no_arguments() {
        let debate = debate_with_counting();
        let report = debate
            .conduct(&ContextBundle::for_ticker("AAPL"), 1)
            .await;
        assert_eq!(report.history.len(), 1);
        // Round 0 prompts carry no counter-argument section
        for entry in &report.history[0].entries {
            assert!(!entry.analysis.contains("Arguments to Address"));
            assert!(!entry.analysis.contains("Arguments to Challenge"));
        }
    }

    #[tokio::test]
    async fn test_round_k_sees_previous_round_only() {
        let debate = debate_with_counting();
        let report = debate
            .conduct(&ContextBundle::for_ticker("AAPL"), 3)
            .await;
        assert_eq!(report.history.len(), 3);

        // Outputs are labelled BULL-0, BEAR-1 (round 0), BULL-2, BEAR-3
        // (round 1), BULL-4, BEAR-5 (round 2). Round 2's bull prompt must
        // embed the bear's round-1 output and not its round-0 output.
        let bull_round2 = &report.history[2].entries[0].analysis;
        assert!(bull_round2.contains("BEAR-3"));
        assert!(!bull_round2.contains("BEAR-1 "));

        let bear_round2 = &report.history[2].entries[1].analysis;
        assert!(bear_round2.contains("BULL-2"));
        assert!(!bear_round2.contains("BULL-0 "));
    }

    #[tokio::test]
    async fn test_final_arguments_match_last_round() {
        let debate = debate_with_counting();
        let report = debate
            .conduct(&ContextBundle::for_ticker("AAPL"), 2)
            .await;
        let last = report.history.last().expect("history non-empty");
        assert_eq!(report.bull_analysis, last.entries[0].analysis);
        assert_eq!(report.bear_analysis, last.entries[1].analysis);
    }

    struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> memo_llm::Result<CompletionResponse> {
            Err(memo_llm::LLMError::RequestFailed("wire down".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_persona_failure_degrades_round_still_advances() {
        let client = PersonaClient::new(
            Arc::new(FailingProvider),
            Arc::new(EngineConfig::default()),
        );
        let debate = ResearchDebate::new(client);
        let report = debate
            .conduct(&ContextBundle::for_ticker("AAPL"), 2)
            .await;

        // Every slot still carries text and all rounds completed
        assert_eq!(report.history.len(), 2);
        assert!(report.bull_analysis.starts_with("Error in BullResearcher:"));
        assert!(report.bear_analysis.starts_with("Error in BearResearcher:"));
        assert!(
            report
                .debate_synthesis
                .starts_with("Error in ResearchDirector:")
        );
    }

    #[test]
    fn test_disabled_report_placeholders() {
        let report = ResearchDebateReport::disabled();
        assert_eq!(report.bull_analysis, "Research debate disabled");
        assert!(report.history.is_empty());
        assert!(report.key_points.bull_key_points.is_empty());
    }
}
