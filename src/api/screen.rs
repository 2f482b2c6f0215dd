//! Screener endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::screener;
use crate::types::{MarketHealth, ScreenCandidate, ScreenReport};
use crate::AppState;

/// Body of `POST /api/screen`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRequest {
    pub candidates: Vec<ScreenCandidate>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
    /// Market context supplied by the caller.
    pub market_health: Option<MarketHealth>,
}

/// Query parameters for `GET /api/screen`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenQuery {
    /// Comma-separated symbols.
    pub symbols: Option<String>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
    pub range: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(screen_symbols).post(screen_candidates))
}

/// POST /api/screen
///
/// Ranks caller-supplied candidates.
async fn screen_candidates(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ApiResponse<ScreenReport>>> {
    check_batch_size(&state, request.candidates.len())?;

    let report = run_screen(
        &state,
        request.candidates,
        request.min_score,
        request.limit,
        request.market_health,
    )
    .await?;
    Ok(Json(ApiResponse::new(report)))
}

/// GET /api/screen?symbols=A,B,C
///
/// Fetches each symbol's history, then ranks them. Symbols that cannot be
/// fetched are skipped.
async fn screen_symbols(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<ApiResponse<ScreenReport>>> {
    let symbols = parse_symbols(query.symbols.as_deref().unwrap_or(""));
    if symbols.is_empty() {
        return Err(AppError::BadRequest(
            "symbols query parameter is required".to_string(),
        ));
    }
    check_batch_size(&state, symbols.len())?;

    let range = query.range.as_deref();
    if let Some(range) = range {
        super::stock::check_range(range)?;
    }

    let (histories, cached) = state.market_data.histories(&symbols, range).await;
    let candidates: Vec<ScreenCandidate> = histories.iter().map(|h| h.to_candidate()).collect();
    let market_health = state
        .market_data
        .market_context()
        .await
        .map(|report| report.to_health());

    let report = run_screen(&state, candidates, query.min_score, query.limit, market_health).await?;
    Ok(Json(ApiResponse::with_cached(report, cached)))
}

async fn run_screen(
    state: &AppState,
    candidates: Vec<ScreenCandidate>,
    min_score: Option<f64>,
    limit: Option<usize>,
    market_health: Option<MarketHealth>,
) -> Result<ScreenReport> {
    let min_score = min_score.unwrap_or(state.config.screen.min_score);
    let limit = limit.unwrap_or(state.config.screen.limit);

    info!(candidates = candidates.len(), min_score, limit, "screen requested");

    tokio::task::spawn_blocking(move || {
        screener::screen(&candidates, min_score, limit, market_health.as_ref())
    })
    .await
        .map_err(|e| AppError::Internal(format!("screen task failed: {}", e)))
}

fn check_batch_size(state: &AppState, count: usize) -> Result<()> {
    let max = state.config.screen.max_symbols;
    if count > max {
        return Err(AppError::BadRequest(format!(
            "Too many symbols: {} requested, at most {} allowed",
            count, max
        )));
    }
    Ok(())
}

/// Split a comma-separated list, dropping blanks and repeats.
fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol)) {
            symbols.push(symbol.to_string());
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!(
            parse_symbols(" tcs, INFY,,tcs ,reliance"),
            vec!["tcs", "INFY", "reliance"]
        );
        assert!(parse_symbols(" , ").is_empty());
    }

    #[test]
    fn test_request_defaults() {
        let request: ScreenRequest = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(request.candidates.is_empty());
        assert!(request.min_score.is_none());
        assert!(request.limit.is_none());
        assert!(request.market_health.is_none());
    }
}
