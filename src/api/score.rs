//! Single-instrument scoring endpoint.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use super::ApiResponse;
use crate::services::scoring;
use crate::types::{BarSeries, MarketHealth, ScoreInput, ScoreResult};
use crate::AppState;

/// Body of `POST /api/score`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub bars: BarSeries,
    #[serde(default)]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default)]
    pub market_health: Option<MarketHealth>,
}

impl ScoreRequest {
    fn into_parts(self) -> (ScoreInput, Option<MarketHealth>) {
        let input = ScoreInput {
            bars: self.bars,
            fifty_two_week_high: self.fifty_two_week_high,
            fifty_two_week_low: self.fifty_two_week_low,
        };
        (input, self.market_health)
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(score_bars))
}

/// POST /api/score
///
/// Scores a caller-supplied bar series. Short or degenerate series still
/// return 200 with an `INSUFFICIENT_DATA` or `ERROR` signal.
async fn score_bars(Json(request): Json<ScoreRequest>) -> Json<ApiResponse<ScoreResult>> {
    let (input, market_health) = request.into_parts();
    let result = scoring::score(&input, market_health.as_ref());

    info!(
        bars = input.bars.len(),
        score = result.score,
        signal = ?result.signal,
        "scored bar series"
    );

    Json(ApiResponse::new(result))
}
