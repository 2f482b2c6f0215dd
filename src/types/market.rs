use serde::{Deserialize, Serialize};

use super::bar::MarketHealth;

/// Broad-market regime read from a benchmark index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketStatus {
    pub fn recommendation(&self) -> &'static str {
        match self {
            MarketStatus::Bullish => "Favorable for long trades",
            MarketStatus::Bearish => "Caution advised for new positions",
            MarketStatus::Neutral => "Mixed signals - be selective",
        }
    }
}

/// Benchmark index position against its 20- and 50-session averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHealthReport {
    pub index: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub sma20: f64,
    pub sma50: f64,
    #[serde(rename = "isAbove20SMA")]
    pub is_above_sma20: bool,
    #[serde(rename = "isAbove50SMA")]
    pub is_above_sma50: bool,
    pub market_status: MarketStatus,
    pub recommendation: String,
}

impl MarketHealthReport {
    /// The summary handed to the scoring engine.
    pub fn to_health(&self) -> MarketHealth {
        MarketHealth {
            symbol: self.index.clone(),
            change_percent: self.change_percent,
            is_bullish: self.market_status == MarketStatus::Bullish,
        }
    }
}
