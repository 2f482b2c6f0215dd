//! Broad-market context endpoint.

use axum::{extract::State, routing::get, Json, Router};

use super::ApiResponse;
use crate::error::Result;
use crate::types::MarketHealthReport;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/market-health", get(get_market_health))
}

/// GET /api/market-health
async fn get_market_health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MarketHealthReport>>> {
    let (report, cached) = state.market_data.market_health().await?;
    Ok(Json(ApiResponse::with_cached(report, cached)))
}
