//! Upstream price-history sources.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use serde::Serialize;
use thiserror::Error;

use crate::types::{BarSeries, ScoreInput, ScreenCandidate};

/// Errors raised while fetching price history.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Upstream error {code}: {description}")]
    Api { code: String, description: String },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
}

/// Daily bars plus the metadata needed to score them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHistory {
    pub symbol: String,
    pub name: Option<String>,
    pub bars: BarSeries,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl DailyHistory {
    pub fn score_input(&self) -> ScoreInput {
        ScoreInput {
            bars: self.bars.clone(),
            fifty_two_week_high: self.fifty_two_week_high,
            fifty_two_week_low: self.fifty_two_week_low,
        }
    }

    pub fn to_candidate(&self) -> ScreenCandidate {
        ScreenCandidate {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            bars: self.bars.clone(),
            fifty_two_week_high: self.fifty_two_week_high,
            fifty_two_week_low: self.fifty_two_week_low,
        }
    }
}
