use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::sources::SourceError;

/// Errors raised while analysing a bar series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Fewer bars than an indicator (or the engine) needs.
    #[error("Insufficient data for {indicator}: need at least {required} bars, have {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// Bars out of order or carrying non-finite prices.
    #[error("Invalid bar series: {0}")]
    InvalidSeries(String),

    /// Degenerate input producing an undefined ratio or score.
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Analysis(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Source(SourceError::SymbolNotFound(symbol)) => (
                StatusCode::NOT_FOUND,
                format!("No price history for {}", symbol),
            ),
            AppError::Source(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
