//! User prompt templates rendered from the context bundle

use super::render;
use crate::error::Result;
use memo_core::ContextBundle;
use memo_core::bundle::keys;
use minijinja::context;

const NO_FUNDAMENTAL: &str = "No fundamental analysis available";
const NO_TECHNICAL: &str = "No technical analysis available";
const NO_SENTIMENT: &str = "No sentiment analysis available";
const NO_STRATEGY: &str = "No strategy analysis available";

fn ticker_of(bundle: &ContextBundle) -> &str {
    bundle.ticker().unwrap_or("this stock")
}

/// Fundamental analyst prompt: snapshot facts plus focus areas
pub fn fundamental(bundle: &ContextBundle) -> Result<String> {
    render(
        r"Please analyze the following fundamental data for {{ ticker }}:

{{ facts }}

Provide a clear, concise fundamental analysis focusing on:
1. Key financial metrics and their implications
2. Comparison to sector/industry averages where relevant
3. Financial health assessment
4. Potential red flags or positive indicators

Keep your analysis to 2-3 paragraphs maximum.",
        context! {
            ticker => ticker_of(bundle),
            facts => bundle.render_facts(),
        },
    )
}

/// Technical analyst prompt
pub fn technical(bundle: &ContextBundle) -> Result<String> {
    render(
        r"Please analyze the following technical data for {{ ticker }}:

{{ facts }}

Provide a clear, concise technical analysis focusing on:
1. Current price trends and momentum
2. Key support and resistance levels
3. Volume analysis and its significance
4. Technical indicators and their implications
5. Short-term price outlook

Keep your analysis to 2-3 paragraphs maximum.",
        context! {
            ticker => ticker_of(bundle),
            facts => bundle.render_facts(),
        },
    )
}

/// Sentiment analyst prompt
pub fn sentiment(bundle: &ContextBundle) -> Result<String> {
    render(
        r"Please analyze the following sentiment and news data for {{ ticker }}:

{{ facts }}

Provide a clear, concise sentiment analysis focusing on:
1. Overall sentiment trends and their significance
2. Key news events and their potential impact
3. Social media sentiment analysis
4. Sentiment-based risk factors or opportunities
5. Short-term sentiment outlook

Keep your analysis to 2-3 paragraphs maximum.",
        context! {
            ticker => ticker_of(bundle),
            facts => bundle.render_facts(),
        },
    )
}

/// Chief strategist prompt: synthesize the specialists, the research debate
/// (when it ran) and retrieved memory insights (when available)
pub fn chief(bundle: &ContextBundle) -> Result<String> {
    render(
        r"As Chief Investment Strategist, please synthesize the following analyses for {{ ticker }}:

FUNDAMENTAL ANALYSIS:
{{ fundamental_analysis }}

TECHNICAL ANALYSIS:
{{ technical_analysis }}

SENTIMENT ANALYSIS:
{{ sentiment_analysis }}
{% if debate_synthesis %}
RESEARCH DEBATE SYNTHESIS:
{{ debate_synthesis }}
{% endif %}{% if memory_context %}
HISTORICAL CONTEXT:
{{ memory_context }}
{% endif %}
Please provide:
1. A comprehensive investment thesis synthesizing all analyses
2. A clear recommendation: Buy, Sell, or Hold
3. Key factors supporting your recommendation
4. Confidence level in your recommendation
5. Key risks or opportunities to monitor

Keep your analysis to 3-4 paragraphs maximum and end with a clear recommendation.",
        context! {
            ticker => ticker_of(bundle),
            fundamental_analysis => bundle.get_str_or(keys::FUNDAMENTAL_ANALYSIS, NO_FUNDAMENTAL),
            technical_analysis => bundle.get_str_or(keys::TECHNICAL_ANALYSIS, NO_TECHNICAL),
            sentiment_analysis => bundle.get_str_or(keys::SENTIMENT_ANALYSIS, NO_SENTIMENT),
            debate_synthesis => bundle.get_str(keys::DEBATE_SYNTHESIS),
            memory_context => bundle.get_str(keys::MEMORY_CONTEXT),
        },
    )
}

/// Basic risk manager prompt
pub fn risk_manager(bundle: &ContextBundle) -> Result<String> {
    render(
        r"As Chief Risk Manager, please evaluate the following investment thesis for {{ ticker }}:

CHIEF STRATEGIST ANALYSIS:
{{ chief_analysis }}

FUNDAMENTAL ANALYSIS:
{{ fundamental_analysis }}

TECHNICAL ANALYSIS:
{{ technical_analysis }}

SENTIMENT ANALYSIS:
{{ sentiment_analysis }}

Please provide:
1. Risk assessment of the proposed investment
2. Recommended position size (as percentage of portfolio)
3. Key risk factors that need monitoring
4. Risk mitigation strategies
5. Stop-loss or exit criteria if applicable

Keep your analysis to 2-3 paragraphs maximum and provide specific position size recommendations.",
        context! {
            ticker => ticker_of(bundle),
            chief_analysis => bundle.get_str_or(keys::CHIEF_ANALYSIS, NO_STRATEGY),
            fundamental_analysis => bundle.get_str_or(keys::FUNDAMENTAL_ANALYSIS, NO_FUNDAMENTAL),
            technical_analysis => bundle.get_str_or(keys::TECHNICAL_ANALYSIS, NO_TECHNICAL),
            sentiment_analysis => bundle.get_str_or(keys::SENTIMENT_ANALYSIS, NO_SENTIMENT),
        },
    )
}

/// Bull researcher prompt, with bear arguments to address after round 0
pub fn bull(bundle: &ContextBundle) -> Result<String> {
    render(
        r"Analyze {{ ticker }} from a BULLISH perspective. Build a compelling investment case that addresses:

1. **Growth Catalysts**: What drives future growth? Market expansion, new products, industry trends?
2. **Competitive Advantages**: What moats or advantages does the company have?
3. **Valuation Upside**: Why might the current valuation be attractive?
4. **Positive Indicators**: What technical, fundamental, or sentiment factors are positive?
5. **Bear Counterpoints**: Address potential concerns with data-driven responses

Available Analysis:
- Fundamental Analysis: {{ fundamental_analysis }}
- Technical Analysis: {{ technical_analysis }}
- Sentiment Analysis: {{ sentiment_analysis }}
{% if memory_context %}- Historical Context: {{ memory_context }}
{% endif %}{% if bear_arguments %}- Bear Arguments to Address: {{ bear_arguments }}
{% endif %}
Provide a structured analysis with clear sections and actionable insights.
Focus on the strongest bullish arguments while acknowledging risks honestly.",
        context! {
            ticker => ticker_of(bundle),
            fundamental_analysis => bundle.get_str_or(keys::FUNDAMENTAL_ANALYSIS, NO_FUNDAMENTAL),
            technical_analysis => bundle.get_str_or(keys::TECHNICAL_ANALYSIS, NO_TECHNICAL),
            sentiment_analysis => bundle.get_str_or(keys::SENTIMENT_ANALYSIS, NO_SENTIMENT),
            memory_context => bundle.get_str(keys::MEMORY_CONTEXT),
            bear_arguments => bundle.get_str(keys::BEAR_ARGUMENTS),
        },
    )
}

/// Bear researcher prompt, with bull arguments to challenge after round 0
pub fn bear(bundle: &ContextBundle) -> Result<String> {
    render(
        r"Analyze {{ ticker }} from a BEARISH perspective. Identify potential risks and concerns:

1. **Business Risks**: What could go wrong with the business model or operations?
2. **Competitive Threats**: How might competitors disrupt the company's position?
3. **Market Risks**: What external factors could negatively impact the company?
4. **Valuation Concerns**: Is the current valuation justified or overvalued?
5. **Technical Weaknesses**: What negative technical patterns or indicators exist?
6. **Bull Counterpoints**: Challenge optimistic assumptions with data

Available Analysis:
- Fundamental Analysis: {{ fundamental_analysis }}
- Technical Analysis: {{ technical_analysis }}
- Sentiment Analysis: {{ sentiment_analysis }}
{% if memory_context %}- Historical Context: {{ memory_context }}
{% endif %}{% if bull_arguments %}- Bull Arguments to Challenge: {{ bull_arguments }}
{% endif %}
Provide a structured risk analysis with clear sections and specific concerns.
Focus on material risks while maintaining analytical rigor.",
        context! {
            ticker => ticker_of(bundle),
            fundamental_analysis => bundle.get_str_or(keys::FUNDAMENTAL_ANALYSIS, NO_FUNDAMENTAL),
            technical_analysis => bundle.get_str_or(keys::TECHNICAL_ANALYSIS, NO_TECHNICAL),
            sentiment_analysis => bundle.get_str_or(keys::SENTIMENT_ANALYSIS, NO_SENTIMENT),
            memory_context => bundle.get_str(keys::MEMORY_CONTEXT),
            bull_arguments => bundle.get_str(keys::BULL_ARGUMENTS),
        },
    )
}

/// Research debate synthesis prompt over the final-round arguments
pub fn research_synthesis(ticker: &str, bull_analysis: &str, bear_analysis: &str) -> Result<String> {
    render(
        r"As a Senior Research Director, synthesize the bull and bear debate for {{ ticker }} into balanced insights.

Bull Analysis: {{ bull_analysis }}
Bear Analysis: {{ bear_analysis }}

Provide a synthesis that:
1. Identifies the strongest arguments from both sides
2. Highlights areas of agreement and disagreement
3. Suggests what would need to happen for each thesis to be correct
4. Provides a balanced view of the investment opportunity
5. Identifies key factors to monitor going forward

Structure your response with clear sections and actionable insights.",
        context! {
            ticker => ticker,
            bull_analysis => bull_analysis,
            bear_analysis => bear_analysis,
        },
    )
}

const RISK_DEBATE_FOOTER: &str = r"Investment Thesis: {{ investment_thesis }}
Market Conditions: {{ market_conditions }}
Proposed Position: {{ proposed_position }}
{% if memory_context %}Historical Context: {{ memory_context }}
{% endif %}{% if counter_arguments %}
Arguments to address from the previous round:
{{ counter_arguments }}
{% endif %}";

fn risk_debate_context(bundle: &ContextBundle, counter_keys: [&str; 2]) -> minijinja::Value {
    let counter_arguments = counter_keys
        .iter()
        .filter_map(|key| {
            bundle
                .get_str(key)
                .map(|text| format!("[{key}] {text}"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    context! {
        ticker => ticker_of(bundle),
        investment_thesis => bundle.get_str_or(keys::INVESTMENT_THESIS, NO_STRATEGY),
        market_conditions => bundle.get_str_or(keys::MARKET_CONDITIONS, "No market summary available"),
        proposed_position => bundle
            .get(keys::PROPOSED_POSITION)
            .map(std::string::ToString::to_string)
            .unwrap_or_else(|| "None".to_string()),
        memory_context => bundle.get_str(keys::MEMORY_CONTEXT),
        counter_arguments => if counter_arguments.is_empty() { None } else { Some(counter_arguments) },
    }
}

/// Conservative risk analyst prompt
pub fn conservative(bundle: &ContextBundle) -> Result<String> {
    let template = format!(
        r"Conduct a CONSERVATIVE risk analysis for {{{{ ticker }}}}:

1. **Downside Scenarios**: What are the worst-case outcomes? How bad could it get?
2. **Liquidity Risks**: What happens if we need to exit quickly? Market depth concerns?
3. **Volatility Impact**: How might market volatility affect this position?
4. **Correlation Risks**: How does this position correlate with existing portfolio?
5. **Position Sizing**: Is the proposed position size appropriate for risk tolerance?
6. **Hedging Recommendations**: What hedges would protect against downside?

{RISK_DEBATE_FOOTER}
Provide specific risk metrics, position size recommendations, and hedging strategies.
Focus on protecting capital in adverse scenarios."
    );
    render(
        &template,
        risk_debate_context(bundle, [keys::AGGRESSIVE_ARGUMENTS, keys::NEUTRAL_ARGUMENTS]),
    )
}

/// Aggressive risk analyst prompt
pub fn aggressive(bundle: &ContextBundle) -> Result<String> {
    let template = format!(
        r"Conduct an AGGRESSIVE risk analysis for {{{{ ticker }}}}:

1. **Upside Scenarios**: What are the best-case outcomes? How high could it go?
2. **Asymmetric Opportunities**: Is the risk/reward ratio favorable?
3. **Catalyst Analysis**: What events could drive significant upside?
4. **Position Sizing**: Could we take a larger position given the opportunity?
5. **Leverage Opportunities**: Are there ways to amplify returns?
6. **Timing Considerations**: Is this the optimal entry point?

{RISK_DEBATE_FOOTER}
Provide upside scenarios, optimal position sizing, and strategies to maximize returns.
Focus on opportunities with significant asymmetric upside potential."
    );
    render(
        &template,
        risk_debate_context(bundle, [keys::CONSERVATIVE_ARGUMENTS, keys::NEUTRAL_ARGUMENTS]),
    )
}

/// Neutral risk analyst prompt
pub fn neutral(bundle: &ContextBundle) -> Result<String> {
    let template = format!(
        r"Conduct a NEUTRAL risk analysis for {{{{ ticker }}}}:

1. **Risk/Reward Balance**: What is the optimal risk/reward profile?
2. **Position Sizing**: What position size balances opportunity with risk?
3. **Scenario Analysis**: Provide balanced upside and downside scenarios
4. **Risk Metrics**: Calculate key risk metrics (VaR, Sharpe ratio, etc.)
5. **Portfolio Impact**: How does this position affect overall portfolio risk?
6. **Implementation Strategy**: What's the optimal way to implement this position?

{RISK_DEBATE_FOOTER}
Provide balanced analysis with specific recommendations for optimal risk-adjusted returns.
Focus on data-driven, objective assessment."
    );
    render(
        &template,
        risk_debate_context(bundle, [keys::CONSERVATIVE_ARGUMENTS, keys::AGGRESSIVE_ARGUMENTS]),
    )
}

/// Risk debate synthesis prompt over the final-round analyses
pub fn risk_synthesis(
    ticker: &str,
    conservative: &str,
    aggressive: &str,
    neutral: &str,
) -> Result<String> {
    render(
        r"As a Senior Risk Manager, synthesize the risk debate for {{ ticker }} into actionable recommendations.

Conservative Analysis: {{ conservative }}
Aggressive Analysis: {{ aggressive }}
Neutral Analysis: {{ neutral }}

Provide a synthesis that:
1. Identifies the key risk factors and their relative importance
2. Recommends optimal position sizing based on risk tolerance
3. Suggests risk mitigation strategies and hedging approaches
4. Provides clear risk/reward scenarios
5. Outlines monitoring and exit strategies

Structure your response with clear sections and specific recommendations.",
        context! {
            ticker => ticker,
            conservative => conservative,
            aggressive => aggressive,
            neutral => neutral,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bull_prompt_without_bear_arguments() {
        let bundle = ContextBundle::for_ticker("AAPL")
            .with(keys::FUNDAMENTAL_ANALYSIS, "Solid balance sheet.");
        let prompt = bull(&bundle).expect("render");
        assert!(prompt.contains("BULLISH"));
        assert!(prompt.contains("Solid balance sheet."));
        assert!(!prompt.contains("Bear Arguments to Address"));
    }

    #[test]
    fn test_bull_prompt_with_bear_arguments() {
        let bundle = ContextBundle::for_ticker("AAPL")
            .with(keys::BEAR_ARGUMENTS, "Valuation is stretched.");
        let prompt = bull(&bundle).expect("render");
        assert!(prompt.contains("Bear Arguments to Address: Valuation is stretched."));
    }

    #[test]
    fn test_chief_prompt_uses_placeholders() {
        let bundle = ContextBundle::for_ticker("AAPL");
        let prompt = chief(&bundle).expect("render");
        assert!(prompt.contains("No fundamental analysis available"));
        assert!(!prompt.contains("RESEARCH DEBATE SYNTHESIS"));
    }

    #[test]
    fn test_conservative_sees_both_counterparts() {
        let bundle = ContextBundle::for_ticker("AAPL")
            .with(keys::AGGRESSIVE_ARGUMENTS, "Double the position.")
            .with(keys::NEUTRAL_ARGUMENTS, "Size at three percent.");
        let prompt = conservative(&bundle).expect("render");
        assert!(prompt.contains("Double the position."));
        assert!(prompt.contains("Size at three percent."));
    }
}
