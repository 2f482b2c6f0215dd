use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::analysis::{Confluence, TrendDirection};
use super::pattern::PatternMatch;

/// The ten scoring factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Trend,
    Rsi,
    Macd,
    Volume,
    Pattern,
    Support,
    Adx,
    Sector,
    Week52,
    RiskReward,
}

impl Factor {
    pub const ALL: [Factor; 10] = [
        Factor::Trend,
        Factor::Rsi,
        Factor::Macd,
        Factor::Volume,
        Factor::Pattern,
        Factor::Support,
        Factor::Adx,
        Factor::Sector,
        Factor::Week52,
        Factor::RiskReward,
    ];

    /// Points this factor can contribute.
    pub fn max_points(&self) -> f64 {
        match self {
            Factor::Trend | Factor::Volume => 1.5,
            Factor::Sector | Factor::Week52 => 0.5,
            _ => 1.0,
        }
    }

    /// Score at which the factor counts as confirmed. Sector never passes.
    pub fn pass_threshold(&self) -> Option<f64> {
        match self {
            Factor::Trend => Some(1.0),
            Factor::Volume => Some(0.8),
            Factor::Support => Some(0.4),
            Factor::Week52 => Some(0.3),
            Factor::Sector => None,
            _ => Some(0.5),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Trend => "Trend Alignment",
            Factor::Rsi => "RSI",
            Factor::Macd => "MACD",
            Factor::Volume => "Volume",
            Factor::Pattern => "Candlestick Pattern",
            Factor::Support => "Support",
            Factor::Adx => "ADX Strength",
            Factor::Sector => "Sector Strength",
            Factor::Week52 => "52-Week Position",
            Factor::RiskReward => "Risk/Reward",
        }
    }
}

/// One factor's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub score: f64,
    pub max: f64,
    pub reasons: Vec<String>,
    pub passed: bool,
}

impl FactorScore {
    /// Clamp to the factor's range and settle pass/fail.
    pub fn new(factor: Factor, score: f64, reasons: Vec<String>) -> Self {
        let max = factor.max_points();
        let score = score.clamp(0.0, max);
        let passed = factor.pass_threshold().map_or(false, |t| score >= t);
        Self {
            score,
            max,
            reasons,
            passed,
        }
    }
}

/// Score breakdown keyed by factor, in factor order.
pub type Breakdown = BTreeMap<Factor, FactorScore>;

/// Final signal class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Watchlist,
    Avoid,
    InsufficientData,
    Error,
}

impl Signal {
    /// Partition of the (already rounded) score line.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Signal::StrongBuy
        } else if score >= 7.0 {
            Signal::Buy
        } else if score >= 5.0 {
            Signal::Watchlist
        } else {
            Signal::Avoid
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            Signal::StrongBuy => Confidence::High,
            Signal::Buy => Confidence::Medium,
            Signal::Watchlist => Confidence::Low,
            _ => Confidence::NoConfidence,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "Strong Buy - High confidence setup",
            Signal::Buy => "Buy - Good setup with caution",
            Signal::Watchlist => "Watchlist - Monitor for better entry",
            Signal::Avoid => "Avoid - Weak setup",
            Signal::InsufficientData => "Insufficient data",
            Signal::Error => "Analysis failed",
        }
    }

    /// Whether this is a scored outcome rather than a failure.
    pub fn is_scored(&self) -> bool {
        !matches!(self, Signal::InsufficientData | Signal::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(rename = "NONE")]
    NoConfidence,
}

/// Entry, stop and targets, all two-decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub target1: f64,
    pub target2: f64,
    pub risk_percent: f64,
    pub reward_percent: f64,
    pub risk_reward_ratio: f64,
    pub position_size_note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonTone {
    Bullish,
    Neutral,
    Bearish,
}

/// Headline rationale for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReasons {
    pub tone: ReasonTone,
    pub title: String,
    pub items: Vec<String>,
    pub summary: String,
}

/// Condensed indicator values echoed in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub macd_bullish: bool,
    pub volume_ratio: f64,
    pub adx: Option<f64>,
    pub trend: TrendDirection,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
}

/// Result of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: f64,
    pub max_score: f64,
    pub signal: Signal,
    pub confidence: Confidence,
    pub signal_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_reasons: Option<SignalReasons>,
    pub breakdown: Breakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_setup: Option<TradeSetup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confluence: Option<Confluence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreResult {
    pub const MAX_SCORE: f64 = 10.0;

    /// A zero-score result carrying only a failure signal and message.
    pub fn failed(signal: Signal, error: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            max_score: Self::MAX_SCORE,
            signal,
            confidence: signal.confidence(),
            signal_text: signal.text().to_string(),
            signal_reasons: None,
            breakdown: Breakdown::new(),
            indicators: None,
            trade_setup: None,
            current_price: None,
            price_change: None,
            patterns: Vec::new(),
            confluence: None,
            error: Some(error.into()),
        }
    }

    /// Headline pattern, if any.
    pub fn display_pattern(&self) -> Option<&PatternMatch> {
        self.patterns.first()
    }
}
