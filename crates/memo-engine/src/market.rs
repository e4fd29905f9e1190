//! Market-data boundary types
//!
//! The engine consumes three read-only snapshots per ticker: fundamental,
//! technical and sentiment. Acquisition lives outside the core; snapshots
//! arrive already populated, possibly partially (every quantitative field is
//! optional) or flagged as failed. The pipeline must tolerate both without
//! crashing: missing fields are simply omitted from the persona prompt, and
//! an error-flagged technical snapshot fails the memo at validation.

use memo_core::ContextBundle;
use serde::{Deserialize, Serialize};

/// Placeholder price emitted by upstream test fixtures
///
/// A snapshot carrying exactly this price is treated as static test data by
/// the validator and seals the memo as an error.
pub const STATIC_PLACEHOLDER_PRICE: f64 = 100.0;

/// Fundamental snapshot for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roe: Option<f64>,
}

/// Technical snapshot for one ticker
///
/// Carries the upstream error flag: a failed fetch still produces a
/// snapshot so the pipeline shape is preserved, but the validator refuses
/// to seal a memo built on it as complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_low: Option<f64>,
    /// Upstream fetch failed
    #[serde(default)]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One news item in a sentiment snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Sentiment snapshot for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub ticker: String,
    #[serde(default)]
    pub total_news: usize,
    #[serde(default)]
    pub positive_news: usize,
    #[serde(default)]
    pub negative_news: usize,
    #[serde(default)]
    pub neutral_news: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub news_summaries: Vec<NewsItem>,
}

impl FundamentalSnapshot {
    /// Create an empty snapshot for a ticker
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Extend a context bundle with this snapshot's present facts
    pub fn extend_bundle(&self, bundle: ContextBundle) -> ContextBundle {
        let mut bundle = bundle;
        if let Some(name) = &self.company_name {
            bundle = bundle.with_text("company_name", name.clone());
        }
        if let Some(sector) = &self.sector {
            bundle = bundle.with_text("sector", sector.clone());
        }
        for (key, value) in [
            ("market_cap", self.market_cap),
            ("pe_ratio", self.pe_ratio),
            ("revenue", self.revenue),
            ("net_income", self.net_income),
            ("eps", self.eps),
            ("debt_to_equity", self.debt_to_equity),
            ("current_ratio", self.current_ratio),
            ("profit_margin", self.profit_margin),
            ("roe", self.roe),
        ] {
            if let Some(v) = value {
                bundle = bundle.with(key, v);
            }
        }
        bundle
    }
}

impl TechnicalSnapshot {
    /// Create an empty snapshot for a ticker
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Create an error-flagged snapshot
    pub fn failed(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            error: true,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Extend a context bundle with this snapshot's present facts
    ///
    /// A failed snapshot contributes a descriptive placeholder instead of
    /// numbers, so the technical persona still receives something to say.
    pub fn extend_bundle(&self, bundle: ContextBundle) -> ContextBundle {
        if self.error {
            let message = self
                .error_message
                .as_deref()
                .unwrap_or("technical data unavailable");
            return bundle.with_text(
                "technical_data_note",
                format!("Technical data could not be fetched: {message}"),
            );
        }
        let mut bundle = bundle;
        for (key, value) in [
            ("current_price", self.current_price),
            ("price_change", self.price_change),
            ("price_change_pct", self.price_change_pct),
            ("sma_5", self.sma_5),
            ("sma_20", self.sma_20),
            ("current_volume", self.current_volume),
            ("avg_volume", self.avg_volume),
            ("volume_ratio", self.volume_ratio),
            ("recent_high", self.recent_high),
            ("recent_low", self.recent_low),
        ] {
            if let Some(v) = value {
                bundle = bundle.with(key, v);
            }
        }
        bundle
    }
}

impl SentimentSnapshot {
    /// Create an empty snapshot for a ticker
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Extend a context bundle with this snapshot's facts
    pub fn extend_bundle(&self, bundle: ContextBundle) -> ContextBundle {
        let mut bundle = bundle
            .with("total_news", self.total_news)
            .with("positive_news", self.positive_news)
            .with("negative_news", self.negative_news)
            .with("neutral_news", self.neutral_news);
        if let Some(score) = self.sentiment_score {
            bundle = bundle.with("sentiment_score", score);
        }
        if !self.news_summaries.is_empty() {
            let headlines: Vec<&str> = self
                .news_summaries
                .iter()
                .map(|n| n.headline.as_str())
                .collect();
            bundle = bundle.with_text("recent_headlines", headlines.join("; "));
        }
        bundle
    }
}
