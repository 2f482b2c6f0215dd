use serde::{Deserialize, Serialize};

/// Strong / Moderate / Weak label shared by ADX and trend readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

impl TrendStrength {
    /// Classify a magnitude against (strong, moderate) thresholds, both exclusive.
    pub fn classify(value: f64, strong: f64, moderate: f64) -> Self {
        if value > strong {
            TrendStrength::Strong
        } else if value > moderate {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        }
    }
}

/// RSI reading with zone flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiReading {
    pub current: f64,
    pub previous: Option<f64>,
    pub history: Vec<f64>,
    pub is_oversold: bool,
    pub is_overbought: bool,
    pub in_swing_zone: bool,
    pub is_recovering: bool,
}

impl RsiReading {
    /// Derive the zone flags from the current and previous values.
    pub fn from_values(current: f64, previous: Option<f64>, history: Vec<f64>) -> Self {
        Self {
            current,
            previous,
            history,
            is_oversold: current < 30.0,
            is_overbought: current > 70.0,
            in_swing_zone: (40.0..=60.0).contains(&current),
            is_recovering: previous.map_or(false, |p| p < 40.0 && current >= 40.0),
        }
    }
}

/// One aligned MACD point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD reading. Signal-dependent fields are absent on short histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdReading {
    pub macd: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
    pub history: Vec<MacdPoint>,
    pub is_bullish: bool,
    pub bullish_crossover: bool,
    pub bearish_crossover: bool,
    pub recent_bullish_crossover: bool,
    pub histogram_increasing: bool,
}

impl MacdReading {
    pub fn histogram_or_zero(&self) -> f64 {
        self.histogram.unwrap_or(0.0)
    }
}

/// Trailing EMA values kept for charting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmaHistory {
    pub ema9: Vec<f64>,
    pub ema20: Vec<f64>,
    pub ema21: Vec<f64>,
    pub ema50: Vec<f64>,
}

/// EMA family reading: values, price position, alignment and 9/21 crossovers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmaReading {
    pub ema9: f64,
    pub ema20: f64,
    pub ema21: f64,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,

    pub above_ema9: bool,
    pub above_ema20: bool,
    pub above_ema21: bool,
    pub above_ema50: bool,
    pub above_ema200: bool,

    pub ema9_above21: bool,
    pub bullish_crossover: bool,
    pub bearish_crossover: bool,
    pub recent_crossover: bool,

    pub ema9_above20: bool,
    pub ema20_above50: bool,
    pub ema50_above200: bool,

    pub distance_from_ema9: f64,
    pub distance_from_ema20: f64,
    pub distance_from_ema21: f64,
    pub distance_from_ema50: Option<f64>,
    pub distance_from_ema200: Option<f64>,

    pub history: EmaHistory,
}

/// ADX reading with directional indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxReading {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub is_trending: bool,
    pub is_strong_trend: bool,
    pub is_bullish_trend: bool,
    pub trend_strength: TrendStrength,
}

impl AdxReading {
    pub fn from_values(adx: f64, plus_di: f64, minus_di: f64) -> Self {
        Self {
            adx,
            plus_di,
            minus_di,
            is_trending: adx > 25.0,
            is_strong_trend: adx > 40.0,
            is_bullish_trend: plus_di > minus_di,
            trend_strength: TrendStrength::classify(adx, 40.0, 25.0),
        }
    }
}

/// Volume participation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeSignal {
    Strong,
    Moderate,
    Weak,
}

/// Current volume against its trailing average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeReading {
    pub current: f64,
    pub average20: f64,
    /// Two-decimal ratio of current to average volume.
    pub ratio: f64,
    pub is_above_average: bool,
    pub is_high_volume: bool,
    pub is_very_high_volume: bool,
    pub is_increasing: bool,
    pub signal: VolumeSignal,
}

/// Bollinger band reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
    pub percent_b: f64,
    pub near_lower: bool,
    pub near_upper: bool,
}

/// ATR reading with ATR-derived stop and target suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtrReading {
    pub value: f64,
    pub percent: f64,
    pub suggested_stop_loss: f64,
    pub suggested_target: f64,
}
