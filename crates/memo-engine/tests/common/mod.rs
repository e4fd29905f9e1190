//! Shared test doubles for pipeline integration tests

use async_trait::async_trait;
use memo_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider that answers every persona with a canned, role-appropriate
/// response, selected by the system prompt
pub struct ScriptedProvider {
    pub calls: AtomicUsize,
    /// Persona markers (matched against the system prompt) that fail; each
    /// entry fails at most `failures_per_marker` times
    failing_markers: Mutex<Vec<(String, usize)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing_markers: Mutex::new(Vec::new()),
        }
    }

    /// Fail calls whose system prompt contains `marker`, `times` times
    pub fn fail_persona(self, marker: &str, times: usize) -> Self {
        self.failing_markers
            .lock()
            .expect("lock")
            .push((marker.to_string(), times));
        self
    }

    fn should_fail(&self, system: &str) -> bool {
        let mut markers = self.failing_markers.lock().expect("lock");
        for (marker, remaining) in markers.iter_mut() {
            if system.contains(marker.as_str()) {
                if *remaining == usize::MAX {
                    return true;
                }
                if *remaining > 0 {
                    *remaining -= 1;
                    return true;
                }
            }
        }
        false
    }
}

pub fn canned_response(system: &str) -> &'static str {
    if system.contains("Fundamental Analyst") {
        "Fundamentals are respectable: margins are expanding and leverage is modest."
    } else if system.contains("Technical Analyst") {
        "The uptrend is intact with rising volume and firm support."
    } else if system.contains("Sentiment Analyst") {
        "Coverage is warm; headline flow skews constructive."
    } else if system.contains("Chief Investment Strategist") {
        "The balance of evidence favors accumulation at current levels.\n\
         Recommendation: Buy\nConfidence: 80%"
    } else if system.contains("Bull Research Analyst") {
        "- Durable growth runway\n- Pricing power underappreciated\nValuation leaves upside."
    } else if system.contains("Bear Research Analyst") {
        "- Growth is decelerating\n- Valuation embeds perfection\nRegulation is a wildcard."
    } else if system.contains("Senior Research Director") {
        "Both sides agree growth matters; they disagree on valuation and regulation."
    } else if system.contains("Conservative Risk Analyst") {
        "Volatile tape argues for care. Recommend 2% position with 60% confidence."
    } else if system.contains("Aggressive Risk Analyst") {
        "Asymmetric setup. Take an 8% position, 80% confidence."
    } else if system.contains("Neutral Risk Analyst") {
        "A 4% position size is stable and safe, 70% confidence."
    } else if system.contains("Senior Risk Manager") {
        "Net risk is moderate; size near 4% of portfolio with explicit stop-losses."
    } else if system.contains("Memory Analysis Agent") {
        "Historical precedents support disciplined entries on pullbacks."
    } else if system.contains("Chief Risk Manager") {
        "Risk is manageable. Recommend a 5% position with defined exits."
    } else {
        "General analysis."
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> memo_llm::Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let system = request.system.as_deref().unwrap_or_default();
        if self.should_fail(system) {
            return Err(LLMError::RequestFailed("scripted failure".to_string()));
        }
        Ok(CompletionResponse {
            message: Message::assistant(canned_response(system)),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 0,
                output_tokens: 0,
            },
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Marker value for `fail_persona` meaning "fail forever"
pub const ALWAYS: usize = usize::MAX;
