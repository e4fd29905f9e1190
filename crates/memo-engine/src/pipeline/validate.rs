//! Post-hoc consistency gate over a finished memo

use crate::market::{STATIC_PLACEHOLDER_PRICE, TechnicalSnapshot};
use crate::memo::Memo;

/// Validate a finished memo against its technical snapshot
///
/// Rules run in order and the first failure wins: upstream technical error
/// flag, absent or static placeholder price, empty required stage text, and
/// recommendation/narrative consistency. Recommendation *validity* needs no
/// rule here: `Recommendation` is an enum, so an out-of-range value is
/// unrepresentable.
///
/// Returns the failure reason; the caller seals the memo with it. Nothing
/// here is thrown past the pipeline boundary.
pub fn validate_memo(memo: &Memo, technical: &TechnicalSnapshot) -> Result<(), String> {
    if technical.error {
        let message = technical
            .error_message
            .as_deref()
            .unwrap_or("Unknown error");
        return Err(format!("Technical data error: {message}"));
    }

    match technical.current_price {
        None => return Err("Invalid or static price detected: none".to_string()),
        Some(price) if price == STATIC_PLACEHOLDER_PRICE => {
            return Err(format!("Invalid or static price detected: {price}"));
        }
        Some(_) => {}
    }

    for (field, text) in [
        ("fundamental_analysis", &memo.fundamental_analysis),
        ("technical_analysis", &memo.technical_analysis),
        ("sentiment_analysis", &memo.sentiment_analysis),
        ("chief_strategist_analysis", &memo.chief_analysis),
    ] {
        if text.is_empty() {
            return Err(format!("Missing critical field: {field}"));
        }
    }

    let recommendation = memo.signal.recommendation.as_str();
    if !memo
        .chief_analysis
        .to_lowercase()
        .contains(&recommendation.to_lowercase())
    {
        return Err(format!(
            "Recommendation mismatch between chief strategist narrative and top-line signal: {recommendation}"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::{
        ExtractedSignal, FeatureFlags, MemoStatus, PipelineMode, Recommendation, RiskCategory,
    };
    use chrono::Utc;

    fn memo_with(chief: &str, recommendation: Recommendation) -> Memo {
        let at = Utc::now();
        Memo {
            id: Memo::make_id("AAPL", at),
            ticker: "AAPL".to_string(),
            created_at: at,
            fundamental_analysis: "fundamentals look fine".to_string(),
            technical_analysis: "trend is up".to_string(),
            sentiment_analysis: "sentiment is warm".to_string(),
            chief_analysis: chief.to_string(),
            risk_assessment: "sized prudently".to_string(),
            research_debate: None,
            risk_debate: None,
            signal: ExtractedSignal {
                recommendation,
                confidence: Some(0.8),
                position_size: Some(5.0),
                risk_score: 5.0,
                risk_category: RiskCategory::Medium,
            },
            status: MemoStatus::Pending,
            error_reason: None,
            features: FeatureFlags::basic(PipelineMode::Basic),
            memory_stored: false,
        }
    }

    fn healthy_technical() -> TechnicalSnapshot {
        TechnicalSnapshot {
            current_price: Some(187.3),
            ..TechnicalSnapshot::for_ticker("AAPL")
        }
    }

    #[test]
    fn test_valid_memo_passes() {
        let memo = memo_with("We recommend Buy with conviction.", Recommendation::Buy);
        assert!(validate_memo(&memo, &healthy_technical()).is_ok());
    }

    #[test]
    fn test_technical_error_flag_fails() {
        let memo = memo_with("We recommend Buy.", Recommendation::Buy);
        let technical = TechnicalSnapshot::failed("AAPL", "quota exhausted");
        let reason = validate_memo(&memo, &technical).expect_err("must fail");
        assert!(reason.contains("Technical data error"));
        assert!(reason.contains("quota exhausted"));
    }

    #[test]
    fn test_missing_price_fails() {
        let memo = memo_with("We recommend Buy.", Recommendation::Buy);
        let technical = TechnicalSnapshot::for_ticker("AAPL");
        let reason = validate_memo(&memo, &technical).expect_err("must fail");
        assert!(reason.contains("Invalid or static price"));
    }

    #[test]
    fn test_static_placeholder_price_fails() {
        let memo = memo_with("We recommend Buy.", Recommendation::Buy);
        let technical = TechnicalSnapshot {
            current_price: Some(100.0),
            ..TechnicalSnapshot::for_ticker("AAPL")
        };
        let reason = validate_memo(&memo, &technical).expect_err("must fail");
        assert!(reason.contains("100"));
    }

    #[test]
    fn test_empty_stage_text_fails() {
        let mut memo = memo_with("We recommend Buy.", Recommendation::Buy);
        memo.sentiment_analysis.clear();
        let reason = validate_memo(&memo, &healthy_technical()).expect_err("must fail");
        assert_eq!(reason, "Missing critical field: sentiment_analysis");
    }

    #[test]
    fn test_recommendation_absent_from_narrative_fails() {
        // Signal says Buy, but the narrative never uses the word
        let memo = memo_with(
            "The outlook is balanced; we remain constructive.",
            Recommendation::Buy,
        );
        let reason = validate_memo(&memo, &healthy_technical()).expect_err("must fail");
        assert!(reason.contains("Recommendation mismatch"));
        assert!(reason.contains("Buy"));
    }

    #[test]
    fn test_rule_order_technical_error_first() {
        // Both the snapshot and the narrative are bad; the snapshot rule wins
        let mut memo = memo_with("Nothing actionable here.", Recommendation::Buy);
        memo.fundamental_analysis.clear();
        let technical = TechnicalSnapshot::failed("AAPL", "down");
        let reason = validate_memo(&memo, &technical).expect_err("must fail");
        assert!(reason.starts_with("Technical data error"));
    }
}
