//! Command-line interface for memo-rs
//!
//! Runs one deliberation for a ticker and prints the sealed memo. Market
//! snapshots are read from a JSON file when given, otherwise the pipeline
//! runs on a minimal sample so the flow can be exercised end to end.

use anyhow::{Context, bail};
use clap::Parser;
use comfy_table::{Cell, Table};
use memo_engine::market::{FundamentalSnapshot, SentimentSnapshot, TechnicalSnapshot};
use memo_engine::{DeliberationEngine, EngineConfig, Memo};
use memo_llm::LLMProvider;
use memo_llm::providers::{AnthropicProvider, OpenAIProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "memo")]
#[command(about = "Generate an investment-analysis memo for a ticker", long_about = None)]
struct Args {
    /// Ticker symbol to deliberate on
    ticker: String,

    /// Run the basic five-persona path instead of the full pipeline
    #[arg(long)]
    basic: bool,

    /// Debate rounds for both debates
    #[arg(long, default_value_t = 2)]
    rounds: usize,

    /// Provider to use: "anthropic" or "openai"
    #[arg(long, default_value = "anthropic")]
    provider: String,

    /// Model identifier override
    #[arg(long)]
    model: Option<String>,

    /// JSON file with {"fundamental": .., "technical": .., "sentiment": ..}
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Print the full memo as JSON instead of the summary view
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_provider(name: &str) -> anyhow::Result<Arc<dyn LLMProvider>> {
    match name {
        "anthropic" => Ok(Arc::new(
            AnthropicProvider::from_env().context("creating Anthropic provider")?,
        )),
        "openai" => Ok(Arc::new(
            OpenAIProvider::from_env().context("creating OpenAI provider")?,
        )),
        other => bail!("unknown provider '{other}' (expected anthropic or openai)"),
    }
}

fn load_snapshots(
    args: &Args,
) -> anyhow::Result<(FundamentalSnapshot, TechnicalSnapshot, SentimentSnapshot)> {
    if let Some(path) = &args.snapshots {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshots from {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&raw).context("parsing snapshots")?;
        let fundamental = serde_json::from_value(value["fundamental"].clone())
            .context("parsing fundamental snapshot")?;
        let technical = serde_json::from_value(value["technical"].clone())
            .context("parsing technical snapshot")?;
        let sentiment = serde_json::from_value(value["sentiment"].clone())
            .context("parsing sentiment snapshot")?;
        return Ok((fundamental, technical, sentiment));
    }

    // Minimal sample so the pipeline can run without a data feed
    let ticker = args.ticker.as_str();
    Ok((
        FundamentalSnapshot {
            pe_ratio: Some(25.0),
            profit_margin: Some(0.24),
            ..FundamentalSnapshot::for_ticker(ticker)
        },
        TechnicalSnapshot {
            current_price: Some(187.3),
            sma_20: Some(181.0),
            volume_ratio: Some(1.1),
            ..TechnicalSnapshot::for_ticker(ticker)
        },
        SentimentSnapshot {
            total_news: 10,
            positive_news: 6,
            negative_news: 2,
            neutral_news: 2,
            sentiment_score: Some(0.4),
            ..SentimentSnapshot::for_ticker(ticker)
        },
    ))
}

fn print_memo(memo: &Memo) {
    println!("\nMemo {} ({:?})", memo.id, memo.status);
    if let Some(reason) = &memo.error_reason {
        println!("Reason: {reason}");
    }

    let mut table = Table::new();
    table.set_header(vec!["Signal", "Value"]);
    table.add_row(vec![
        Cell::new("Recommendation"),
        Cell::new(memo.signal.recommendation.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Confidence"),
        Cell::new(
            memo.signal
                .confidence
                .map_or_else(|| "-".to_string(), |c| format!("{:.0}%", c * 100.0)),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Position size"),
        Cell::new(
            memo.signal
                .position_size
                .map_or_else(|| "-".to_string(), |p| format!("{p}%")),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Risk"),
        Cell::new(format!(
            "{:.1} ({})",
            memo.signal.risk_score, memo.signal.risk_category
        )),
    ]);
    println!("{table}");

    println!("\n== Chief strategist ==\n{}", memo.chief_analysis);
    println!("\n== Risk assessment ==\n{}", memo.risk_assessment);
    if let Some(debate) = &memo.research_debate {
        println!("\n== Research debate synthesis ==\n{}", debate.debate_synthesis);
        if !debate.key_points.consensus_areas.is_empty() {
            println!("\nConsensus areas:");
            for area in &debate.key_points.consensus_areas {
                println!("  - {area}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let provider = build_provider(&args.provider)?;
    let mut builder = EngineConfig::builder()
        .research_rounds(args.rounds)
        .risk_rounds(args.rounds);
    if let Some(model) = &args.model {
        builder = builder.model(model.clone());
    }
    let config = builder.build()?;

    let engine = DeliberationEngine::new(provider, config);
    let (fundamental, technical, sentiment) = load_snapshots(&args)?;

    info!(ticker = %args.ticker, basic = args.basic, "starting deliberation");

    let memo = if args.basic {
        engine
            .generate_memo(&args.ticker, &fundamental, &technical, &sentiment)
            .await
    } else {
        engine
            .generate_enhanced_memo(&args.ticker, &fundamental, &technical, &sentiment)
            .await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&memo)?);
    } else {
        print_memo(&memo);
    }

    Ok(())
}
