//! Fetch-and-score endpoint for a single symbol.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::scoring;
use crate::types::{Bar, IndicatorSnapshot, MarketHealthReport, ScoreResult};
use crate::AppState;

/// Chart ranges the upstream accepts for daily bars.
const VALID_RANGES: &[&str] = &["3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"];

/// Bars returned for charting, about six weeks of sessions.
const CHART_BARS: usize = 30;

/// Score, readings and recent bars for one symbol.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    pub score: ScoreResult,
    /// Full readings the score was computed from; absent when not scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
    pub candles: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_health: Option<MarketHealthReport>,
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    /// Chart range, defaults to the configured history range.
    pub range: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_stock_score))
}

pub(crate) fn check_range(range: &str) -> Result<()> {
    if VALID_RANGES.contains(&range) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid range '{}', expected one of {}",
            range,
            VALID_RANGES.join(", ")
        )))
    }
}

/// GET /api/stock/:symbol
async fn get_stock_score(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<Json<ApiResponse<StockAnalysis>>> {
    if symbol.trim().is_empty() {
        return Err(AppError::BadRequest("symbol is required".to_string()));
    }
    let range = query.range.as_deref();
    if let Some(range) = range {
        check_range(range)?;
    }

    let fetched = state.market_data.history(&symbol, range).await?;
    let history = fetched.history;
    let market_health = state.market_data.market_context().await;
    let context = market_health.as_ref().map(MarketHealthReport::to_health);
    let (score, indicators) = scoring::analyze(&history.score_input(), context.as_ref());

    info!(
        symbol = history.symbol.as_str(),
        score = score.score,
        signal = ?score.signal,
        cached = fetched.cached,
        "scored stock"
    );

    let bars = history.bars.bars();
    let analysis = StockAnalysis {
        symbol: history.symbol.clone(),
        name: history
            .name
            .clone()
            .unwrap_or_else(|| history.symbol.clone()),
        fifty_two_week_high: history.fifty_two_week_high,
        fifty_two_week_low: history.fifty_two_week_low,
        score,
        indicators,
        candles: bars[bars.len().saturating_sub(CHART_BARS)..].to_vec(),
        market_health,
    };

    Ok(Json(ApiResponse::with_cached(analysis, fetched.cached)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range("1y").is_ok());
        assert!(check_range("max").is_ok());
        assert!(matches!(check_range("1d"), Err(AppError::BadRequest(_))));
        assert!(check_range("1y&interval=1m").is_err());
    }
}
