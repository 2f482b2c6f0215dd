use serde::{Deserialize, Serialize};

use super::indicators::{
    AdxReading, AtrReading, BollingerReading, EmaReading, MacdReading, RsiReading, TrendStrength,
    VolumeReading,
};
use super::pattern::{CandlestickReading, PatternMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
}

/// Overall trend classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// 20-bar percent change, two decimals.
    pub change20_day: f64,
    pub is_uptrend: bool,
    pub is_downtrend: bool,
    pub is_sideways: bool,
    pub ema_trend_aligned: bool,
}

/// Nearest swing levels around the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResistance {
    pub nearest_support: f64,
    pub nearest_resistance: f64,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub near_support: bool,
    pub distance_to_support: f64,
    pub distance_to_resistance: f64,
}

/// One confluence checklist category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceCategory {
    pub name: String,
    pub checks: Vec<String>,
    pub score: f64,
    pub max_score: f64,
    pub pass_threshold: f64,
    pub passed: bool,
}

impl ConfluenceCategory {
    pub const MAX_SCORE: f64 = 2.0;

    pub fn new(name: &str, pass_threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
            score: 0.0,
            max_score: Self::MAX_SCORE,
            pass_threshold,
            passed: false,
        }
    }

    pub fn check(&mut self, description: impl Into<String>, points: f64) {
        self.checks.push(description.into());
        self.score += points;
    }

    /// Cap the score and settle pass/fail.
    pub fn finish(mut self) -> Self {
        self.score = self.score.min(self.max_score);
        self.passed = self.score >= self.pass_threshold;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfluenceSummary {
    Strong,
    Valid,
    Weak,
    #[serde(rename = "NONE")]
    NoConfluence,
}

impl ConfluenceSummary {
    pub fn from_passed(passed_count: usize) -> Self {
        match passed_count {
            n if n >= 4 => ConfluenceSummary::Strong,
            3 => ConfluenceSummary::Valid,
            2 => ConfluenceSummary::Weak,
            _ => ConfluenceSummary::NoConfluence,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfluenceSummary::Strong => "STRONG CONFLUENCE (4/4)",
            ConfluenceSummary::Valid => "VALID CONFLUENCE (3/4)",
            ConfluenceSummary::Weak => "WEAK CONFLUENCE (2/4)",
            ConfluenceSummary::NoConfluence => "NO CONFLUENCE",
        }
    }
}

/// Four-category confirmation checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confluence {
    pub trend: ConfluenceCategory,
    pub volume: ConfluenceCategory,
    pub momentum: ConfluenceCategory,
    pub pattern: ConfluenceCategory,
    pub passed_count: usize,
    pub total_checks: usize,
    pub is_valid: bool,
    pub summary: ConfluenceSummary,
}

impl Confluence {
    pub fn from_categories(
        trend: ConfluenceCategory,
        volume: ConfluenceCategory,
        momentum: ConfluenceCategory,
        pattern: ConfluenceCategory,
    ) -> Self {
        let passed_count = [&trend, &volume, &momentum, &pattern]
            .iter()
            .filter(|c| c.passed)
            .count();

        Self {
            trend,
            volume,
            momentum,
            pattern,
            passed_count,
            total_checks: 4,
            is_valid: passed_count >= 3,
            summary: ConfluenceSummary::from_passed(passed_count),
        }
    }
}

/// Everything computed from one bar series, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub current_price: f64,
    pub previous_close: f64,
    pub rsi: RsiReading,
    pub macd: MacdReading,
    pub emas: EmaReading,
    /// Absent when the history is too short for Wilder ADX.
    pub adx: Option<AdxReading>,
    pub volume: VolumeReading,
    pub bollinger: BollingerReading,
    pub atr: AtrReading,
    pub candles: CandlestickReading,
    pub swing_patterns: Vec<PatternMatch>,
    pub trend: TrendAnalysis,
    pub support_resistance: SupportResistance,
    pub confluence: Confluence,
}
