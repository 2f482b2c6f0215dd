use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One trading session of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Signed body (close - open).
    pub fn body(&self) -> f64 {
        self.close - self.open
    }

    pub fn body_size(&self) -> f64 {
        self.body().abs()
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Full high-to-low range of the session.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Chronologically ordered bars.
///
/// Construction rejects out-of-order dates and non-finite prices. Length is
/// not checked here; the scoring engine owns the minimum-history gate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for (i, bar) in bars.iter().enumerate() {
            let fields = [bar.open, bar.high, bar.low, bar.close, bar.volume];
            if fields.iter().any(|v| !v.is_finite()) {
                return Err(AnalysisError::InvalidSeries(format!(
                    "bar {} ({}) has a non-finite value",
                    i, bar.date
                )));
            }
            if i > 0 && bar.date < bars[i - 1].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "bar {} ({}) is dated before the previous bar ({})",
                    i,
                    bar.date,
                    bars[i - 1].date
                )));
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn into_inner(self) -> Vec<Bar> {
        self.bars
    }
}

impl TryFrom<Vec<Bar>> for BarSeries {
    type Error = AnalysisError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<BarSeries> for Vec<Bar> {
    fn from(series: BarSeries) -> Self {
        series.bars
    }
}

/// Input to a single scoring call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub bars: BarSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
}

impl ScoreInput {
    pub fn new(bars: BarSeries) -> Self {
        Self {
            bars,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
        }
    }

    pub fn with_week52(mut self, high: f64, low: f64) -> Self {
        self.fifty_two_week_high = Some(high);
        self.fifty_two_week_low = Some(low);
        self
    }

    /// 52-week (high, low) when both are present and form a real range.
    pub fn week52(&self) -> Option<(f64, f64)> {
        match (self.fifty_two_week_high, self.fifty_two_week_low) {
            (Some(high), Some(low)) if high > low && low > 0.0 => Some((high, low)),
            _ => None,
        }
    }
}

/// Broad-market context for a scoring call. Logged, not scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHealth {
    pub symbol: String,
    pub change_percent: f64,
    pub is_bullish: bool,
}
