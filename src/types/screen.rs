use serde::{Deserialize, Serialize};

use super::bar::{BarSeries, ScoreInput};
use super::score::ScoreResult;

/// One instrument offered to the screener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenCandidate {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bars: BarSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
}

impl ScreenCandidate {
    pub fn score_input(&self) -> ScoreInput {
        ScoreInput {
            bars: self.bars.clone(),
            fifty_two_week_high: self.fifty_two_week_high,
            fifty_two_week_low: self.fifty_two_week_low,
        }
    }
}

/// A scored instrument in a screen report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    pub symbol: String,
    pub name: String,
    #[serde(flatten)]
    pub result: ScoreResult,
}

/// Ranked screen output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenReport {
    /// Candidates scored.
    pub screened: usize,
    /// Candidates at or above the minimum score, before truncation.
    pub qualified: usize,
    pub min_score: f64,
    pub stocks: Vec<RankedScore>,
}
