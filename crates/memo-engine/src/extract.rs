//! Free-text signal extraction
//!
//! Recovers structured fields from persona output by applying ordered
//! textual pattern rules per field, first match wins. This is deliberate
//! literal matching, not sentiment analysis: the rules (including the
//! sell-beats-buy asymmetry) are observable behavior that downstream
//! consumers depend on, and they must not be "improved".
//!
//! Every function here is pure, deterministic and total: malformed input
//! yields the documented default, never an error.

use crate::memo::{Recommendation, RiskCategory};
use regex::Regex;
use std::sync::LazyLock;

/// Keywords tallied toward risk in the risk-score heuristic
pub const RISK_KEYWORDS: [&str; 6] = [
    "high risk",
    "volatile",
    "uncertainty",
    "danger",
    "warning",
    "caution",
];

/// Keywords tallied toward safety in the risk-score heuristic
pub const SAFETY_KEYWORDS: [&str; 5] = ["safe", "stable", "conservative", "low risk", "defensive"];

/// Shared vocabulary checked for consensus between bull and bear analyses
pub const CONSENSUS_KEYWORDS: [&str; 10] = [
    "volatility",
    "uncertainty",
    "competition",
    "regulation",
    "market conditions",
    "valuation",
    "growth",
    "risk",
    "opportunity",
    "challenge",
];

/// Extract a Buy/Sell/Hold recommendation from analysis text
///
/// Case-insensitive literal scan: "buy" present without "sell" is Buy;
/// "sell" present (with or without "buy") is Sell; neither is Hold.
/// Sell wins whenever both words appear.
pub fn extract_recommendation(text: &str) -> Recommendation {
    let lower = text.to_lowercase();
    let has_buy = lower.contains("buy");
    let has_sell = lower.contains("sell");
    if has_buy && !has_sell {
        Recommendation::Buy
    } else if has_sell {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

/// How a matched confidence number maps into [0, 1]
enum ConfidenceScale {
    Percent,
    TenPoint,
}

static CONFIDENCE_PATTERNS: LazyLock<Vec<(Regex, ConfidenceScale)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)confidence.*?(\d+(?:\.\d+)?)\s*%").expect("valid pattern"),
            ConfidenceScale::Percent,
        ),
        (
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*confidence").expect("valid pattern"),
            ConfidenceScale::Percent,
        ),
        (
            Regex::new(r"(?i)confidence.*?(\d+(?:\.\d+)?)/10").expect("valid pattern"),
            ConfidenceScale::TenPoint,
        ),
        (
            Regex::new(r"(?i)(\d+(?:\.\d+)?)/10\s*confidence").expect("valid pattern"),
            ConfidenceScale::TenPoint,
        ),
    ]
});

/// Extract a confidence level in [0, 1] from analysis text
///
/// Patterns are tried in declared order; the first match wins. Percent
/// phrasings normalize by 100, ten-point phrasings by 10. `None` when no
/// pattern matches; the enhanced pipeline substitutes its 0.7 default, the
/// basic pipeline leaves the field unset.
pub fn extract_confidence(text: &str) -> Option<f64> {
    for (pattern, scale) in CONFIDENCE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            return Some(match scale {
                ConfidenceScale::Percent => value / 100.0,
                ConfidenceScale::TenPoint => value / 10.0,
            });
        }
    }
    None
}

static POSITION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*(?:position|allocation|size)")
            .expect("valid pattern"),
        Regex::new(r"(?i)position\s*size.*?(\d+(?:\.\d+)?)\s*%").expect("valid pattern"),
        Regex::new(r"(?i)recommend.*?(\d+(?:\.\d+)?)\s*%").expect("valid pattern"),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*of\s*portfolio").expect("valid pattern"),
    ]
});

/// Extract a position size (plain percentage of portfolio) from text
///
/// Ordered first-match rules; the value is not normalized. `None` when no
/// pattern matches; the enhanced pipeline substitutes its 5.0 default.
pub fn extract_position_size(text: &str) -> Option<f64> {
    for pattern in POSITION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return caps.get(1)?.as_str().parse().ok();
        }
    }
    None
}

/// Compute a 1-10 risk score over the given persona outputs
///
/// Each lexicon keyword counts at most once per text (presence, not
/// occurrence count). Score is `1 + 9 * risk / (risk + safety)`; 5.0 when
/// neither lexicon appears at all.
pub fn risk_score(texts: &[&str]) -> f64 {
    let mut risk_count = 0usize;
    let mut safety_count = 0usize;

    for text in texts {
        let lower = text.to_lowercase();
        risk_count += RISK_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
        safety_count += SAFETY_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count();
    }

    if risk_count == 0 && safety_count == 0 {
        return 5.0;
    }

    let risk_ratio = risk_count as f64 / (risk_count + safety_count) as f64;
    1.0 + risk_ratio * 9.0
}

/// Categorize a risk score
pub fn risk_category(score: f64) -> RiskCategory {
    RiskCategory::from_score(score)
}

static BULLET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"[-•*]\s*([^\n]+)").expect("valid pattern"),
        Regex::new(r"\d+\.\s*([^\n]+)").expect("valid pattern"),
        Regex::new(
            r"(?i)(?:Key|Important|Critical|Major)\s+(?:point|factor|consideration|risk):\s*([^\n]+)",
        )
        .expect("valid pattern"),
    ]
});

/// Extract bullet-like lines (bullets, numbered items, key statements)
///
/// Patterns run in declared order and their matches are concatenated, so
/// bullet lines always sort ahead of numbered items regardless of where
/// they appear in the text.
pub fn extract_bullet_points(text: &str) -> Vec<String> {
    let mut points = Vec::new();
    for pattern in BULLET_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let point = m.as_str().trim();
                if !point.is_empty() {
                    points.push(point.to_string());
                }
            }
        }
    }
    points
}

/// Report consensus keywords appearing in both bull and bear analyses
pub fn find_consensus_areas(bull_analysis: &str, bear_analysis: &str) -> Vec<String> {
    let bull_lower = bull_analysis.to_lowercase();
    let bear_lower = bear_analysis.to_lowercase();

    CONSENSUS_KEYWORDS
        .iter()
        .filter(|kw| bull_lower.contains(*kw) && bear_lower.contains(*kw))
        .map(|kw| format!("Both analyses mention {kw}"))
        .collect()
}

static RISK_FACTOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)(?:risk|concern|threat|challenge):\s*([^\n.]+)").expect("valid pattern"),
        Regex::new(r"(?i)(?:key|major|primary)\s+(?:risk|concern):\s*([^\n.]+)")
            .expect("valid pattern"),
        Regex::new(r"[-*]\s*([^\n]+)").expect("valid pattern"),
    ]
});

/// Extract key risk factors across the risk analysts' outputs
///
/// Labelled risk lines and bullets, trimmed, deduplicated in first-seen
/// order, minimum length 10, capped at 10 factors.
pub fn extract_risk_factors(texts: &[&str]) -> Vec<String> {
    let mut factors: Vec<String> = Vec::new();

    for text in texts {
        for pattern in RISK_FACTOR_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    let factor = m.as_str().trim();
                    if factor.len() > 10 && !factors.iter().any(|f| f == factor) {
                        factors.push(factor.to_string());
                    }
                }
            }
        }
    }

    factors.truncate(10);
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_buy() {
        assert_eq!(
            extract_recommendation("Strong buy signal"),
            Recommendation::Buy
        );
    }

    #[test]
    fn test_recommendation_sell_wins_over_buy() {
        // The asymmetry is intentional: sell always wins when both appear
        assert_eq!(
            extract_recommendation("We recommend a buy sell hedge"),
            Recommendation::Sell
        );
    }

    #[test]
    fn test_recommendation_hold() {
        assert_eq!(
            extract_recommendation("Maintain current position"),
            Recommendation::Hold
        );
    }

    #[test]
    fn test_recommendation_case_insensitive() {
        assert_eq!(extract_recommendation("BUY NOW"), Recommendation::Buy);
        assert_eq!(extract_recommendation("SELL everything"), Recommendation::Sell);
    }

    #[test]
    fn test_confidence_percent() {
        assert_eq!(extract_confidence("confidence: 85%"), Some(0.85));
        assert_eq!(extract_confidence("I have 70% confidence here"), Some(0.70));
    }

    #[test]
    fn test_confidence_ten_point() {
        assert_eq!(extract_confidence("confidence: 7/10"), Some(0.7));
        assert_eq!(extract_confidence("rated 8/10 confidence"), Some(0.8));
    }

    #[test]
    fn test_confidence_first_pattern_wins() {
        // Percent phrasing is declared before ten-point phrasing
        assert_eq!(
            extract_confidence("confidence: 85% overall, previously 6/10 confidence"),
            Some(0.85)
        );
    }

    #[test]
    fn test_confidence_absent() {
        assert_eq!(extract_confidence("no numbers here"), None);
    }

    #[test]
    fn test_confidence_deterministic() {
        let text = "Confidence: 62.5%";
        assert_eq!(extract_confidence(text), extract_confidence(text));
    }

    #[test]
    fn test_position_size_patterns() {
        assert_eq!(extract_position_size("take a 3% position"), Some(3.0));
        assert_eq!(
            extract_position_size("position size should be 4.5%"),
            Some(4.5)
        );
        assert_eq!(extract_position_size("we recommend 2% here"), Some(2.0));
        assert_eq!(extract_position_size("allocate 7% of portfolio"), Some(7.0));
    }

    #[test]
    fn test_position_size_not_normalized() {
        // Plain percentage, not a fraction
        assert_eq!(extract_position_size("10% allocation"), Some(10.0));
    }

    #[test]
    fn test_position_size_absent() {
        assert_eq!(extract_position_size("size it appropriately"), None);
    }

    #[test]
    fn test_risk_score_neutral_default() {
        assert!((risk_score(&["", "", ""]) - 5.0).abs() < f64::EPSILON);
        assert_eq!(risk_category(5.0), RiskCategory::Medium);
    }

    #[test]
    fn test_risk_score_all_risk() {
        let score = risk_score(&["high risk and volatile", "", ""]);
        assert!((score - 10.0).abs() < f64::EPSILON);
        assert_eq!(risk_category(score), RiskCategory::High);
    }

    #[test]
    fn test_risk_score_all_safety() {
        let score = risk_score(&["safe and stable", "", ""]);
        assert!((score - 1.0).abs() < f64::EPSILON);
        assert_eq!(risk_category(score), RiskCategory::Low);
    }

    #[test]
    fn test_risk_score_counts_presence_per_text() {
        // "volatile volatile volatile" counts once; one safety keyword balances
        let score = risk_score(&["volatile volatile volatile", "safe", ""]);
        assert!((score - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bullet_points() {
        let text = "Overview first.\n- Margins widening\n* Buybacks continue\n1. Debt is low\nKey factor: pricing power";
        let points = extract_bullet_points(text);
        assert!(points.contains(&"Margins widening".to_string()));
        assert!(points.contains(&"Buybacks continue".to_string()));
        assert!(points.contains(&"Debt is low".to_string()));
        assert!(points.contains(&"pricing power".to_string()));
    }

    #[test]
    fn test_consensus_areas() {
        let bull = "Growth is strong despite volatility.";
        let bear = "Volatility and weak growth worry us.";
        let areas = find_consensus_areas(bull, bear);
        assert!(areas.contains(&"Both analyses mention volatility".to_string()));
        assert!(areas.contains(&"Both analyses mention growth".to_string()));
        assert!(!areas.contains(&"Both analyses mention regulation".to_string()));
    }

    #[test]
    fn test_risk_factors_deduplicated_and_capped() {
        let text = "Risk: supply chain concentration in one region\n\
                    Risk: supply chain concentration in one region\n\
                    - a competitor is undercutting prices aggressively";
        let factors = extract_risk_factors(&[text]);
        assert_eq!(
            factors
                .iter()
                .filter(|f| f.contains("supply chain"))
                .count(),
            1
        );
        assert!(factors.len() <= 10);
    }

    #[test]
    fn test_risk_factors_minimum_length() {
        let factors = extract_risk_factors(&["Risk: none\n- short"]);
        assert!(factors.is_empty());
    }
}
