//! Outcome analytics over the historical store

use super::store::{MemoryStore, Outcome};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric key carrying the realized return percentage
const RETURN_PCT: &str = "return_pct";

/// Lookback window for analytics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    Days7,
    #[default]
    Days30,
    Days90,
}

impl TimeWindow {
    /// Parse a window label ("7d", "30d", "90d"); anything else is 30 days
    pub fn parse(label: &str) -> Self {
        match label {
            "7d" => Self::Days7,
            "90d" => Self::Days90,
            _ => Self::Days30,
        }
    }

    fn duration(self) -> Duration {
        match self {
            Self::Days7 => Duration::days(7),
            Self::Days30 => Duration::days(30),
            Self::Days90 => Duration::days(90),
        }
    }
}

/// Per-outcome aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeStats {
    pub count: usize,
    /// Share of all labelled decisions in the window
    pub percentage: f64,
    pub avg_return: f64,
}

/// Aggregated performance over a ticker/time window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub total_decisions: usize,
    pub success_rate: f64,
    pub avg_return: f64,
    pub outcome_breakdown: BTreeMap<String, OutcomeStats>,
}

/// Group labelled records by outcome over a ticker/time window
pub fn performance_analytics(
    store: &MemoryStore,
    ticker: Option<&str>,
    window: TimeWindow,
) -> PerformanceAnalytics {
    let cutoff = Utc::now() - window.duration();

    let mut grouped: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    for record in store.snapshot() {
        let Some(outcome) = record.outcome else {
            continue;
        };
        if record.created_at < cutoff {
            continue;
        }
        if let Some(wanted) = ticker {
            if record.ticker != wanted {
                continue;
            }
        }
        let return_pct = record
            .performance_metrics
            .get(RETURN_PCT)
            .copied()
            .unwrap_or(0.0);
        grouped.entry(outcome.as_str()).or_default().push(return_pct);
    }

    let total_decisions: usize = grouped.values().map(Vec::len).sum();
    let mut analytics = PerformanceAnalytics {
        total_decisions,
        ..PerformanceAnalytics::default()
    };

    if total_decisions == 0 {
        return analytics;
    }

    let mut total_return = 0.0;
    let mut labelled_count = 0usize;
    let mut success_count = 0usize;

    for (label, returns) in &grouped {
        let count = returns.len();
        let avg_return = returns.iter().sum::<f64>() / count as f64;
        analytics.outcome_breakdown.insert(
            (*label).to_string(),
            OutcomeStats {
                count,
                percentage: count as f64 / total_decisions as f64,
                avg_return,
            },
        );

        total_return += returns.iter().sum::<f64>();
        labelled_count += count;
        if *label == Outcome::Success.as_str() {
            success_count += count;
        }
    }

    analytics.success_rate = success_count as f64 / total_decisions as f64;
    analytics.avg_return = total_return / labelled_count as f64;
    analytics
}
