//! Yahoo Finance chart API client for daily price history.
//!
//! Uses the unofficial chart endpoint, which needs no API key.

use chrono::{DateTime, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{DailyHistory, SourceError};
use crate::types::{Bar, BarSeries};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Trading sessions in a year, for the 52-week fallback.
const SESSIONS_PER_YEAR: usize = 252;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    short_name: Option<String>,
    long_name: Option<String>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Upper-case `symbol` and append the exchange `suffix` when it has none.
///
/// Index symbols (`^NSEI`) and symbols that already carry a suffix are left
/// as they are.
pub fn normalize_symbol(symbol: &str, suffix: Option<&str>) -> String {
    let symbol = symbol.trim().to_uppercase();
    match suffix {
        Some(suffix) if !symbol.contains('.') && !symbol.starts_with('^') => {
            format!("{}{}", symbol, suffix.to_uppercase())
        }
        _ => symbol,
    }
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against another chart API host.
    pub fn with_base_url(base_url: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch daily bars for an already-normalized symbol.
    ///
    /// `range` is a Yahoo chart range ("3mo", "6mo", "1y", "2y", ...).
    pub async fn get_daily_history(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<DailyHistory, SourceError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false",
            self.base_url, symbol, range
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SourceError::SymbolNotFound(symbol.to_string())),
            status if !status.is_success() => {
                warn!(symbol, status = status.as_u16(), "Yahoo Finance request failed");
                return Err(SourceError::Status(status.as_u16()));
            }
            _ => {}
        }

        let data: ChartResponse = response.json().await?;
        parse_chart(data, symbol)
    }
}

fn parse_chart(data: ChartResponse, symbol: &str) -> Result<DailyHistory, SourceError> {
    if let Some(error) = data.chart.error {
        if error.code == "Not Found" {
            return Err(SourceError::SymbolNotFound(symbol.to_string()));
        }
        return Err(SourceError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::SymbolNotFound(symbol.to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next();
    let (opens, highs, lows, closes, volumes) = match quote {
        Some(q) => (
            q.open.unwrap_or_default(),
            q.high.unwrap_or_default(),
            q.low.unwrap_or_default(),
            q.close.unwrap_or_default(),
            q.volume.unwrap_or_default(),
        ),
        None => Default::default(),
    };
    let value = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        // Sessions without a close are holidays or an unfinished day.
        let Some(close) = value(&closes, i) else {
            continue;
        };
        let Some(date) = session_date(timestamp, result.meta.gmtoffset) else {
            continue;
        };

        bars.push(Bar {
            date,
            open: value(&opens, i).unwrap_or(close),
            high: value(&highs, i).unwrap_or(close),
            low: value(&lows, i).unwrap_or(close),
            close,
            volume: value(&volumes, i).unwrap_or(0.0),
        });
    }

    if bars.is_empty() {
        return Err(SourceError::SymbolNotFound(symbol.to_string()));
    }

    let (fifty_two_week_high, fifty_two_week_low) = match (
        result.meta.fifty_two_week_high,
        result.meta.fifty_two_week_low,
    ) {
        (Some(high), Some(low)) => (Some(high), Some(low)),
        _ => {
            let recent = &bars[bars.len().saturating_sub(SESSIONS_PER_YEAR)..];
            (
                recent.iter().map(|b| b.high).reduce(f64::max),
                recent.iter().map(|b| b.low).reduce(f64::min),
            )
        }
    };

    let bars = BarSeries::new(bars).map_err(|e| SourceError::Api {
        code: "InvalidSeries".to_string(),
        description: e.to_string(),
    })?;

    debug!(symbol, bars = bars.len(), "daily history parsed");

    Ok(DailyHistory {
        symbol: result.meta.symbol,
        name: result.meta.short_name.or(result.meta.long_name),
        bars,
        fifty_two_week_high,
        fifty_two_week_low,
    })
}

/// Exchange-local calendar date of a session timestamp.
fn session_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(meta: serde_json::Value, closes: serde_json::Value) -> ChartResponse {
        serde_json::from_value(json!({
            "chart": {
                "result": [{
                    "meta": meta,
                    // 2024-01-02, -03, -04 at 03:45 UTC
                    "timestamp": [1704167100, 1704253500, 1704339900],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.0, null],
                            "high": [102.0, 103.0, null],
                            "low": [99.0, 100.0, null],
                            "close": closes,
                            "volume": [1000, null, 1200]
                        }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" reliance ", Some(".NS")), "RELIANCE.NS");
        assert_eq!(normalize_symbol("tcs.bo", Some(".NS")), "TCS.BO");
        assert_eq!(normalize_symbol("^nsei", Some(".NS")), "^NSEI");
        assert_eq!(normalize_symbol("aapl", None), "AAPL");
    }

    #[test]
    fn test_parse_drops_null_closes() {
        let data = chart(
            json!({
                "symbol": "INFY.NS",
                "shortName": "Infosys",
                "fiftyTwoWeekHigh": 2000.0,
                "fiftyTwoWeekLow": 1300.0,
                "gmtoffset": 19800
            }),
            json!([101.0, 102.5, null]),
        );
        let history = parse_chart(data, "INFY.NS").unwrap();

        assert_eq!(history.symbol, "INFY.NS");
        assert_eq!(history.name.as_deref(), Some("Infosys"));
        assert_eq!(history.bars.len(), 2);
        assert_eq!(
            history.bars.bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(history.bars.bars()[1].volume, 0.0);
        assert_eq!(history.fifty_two_week_high, Some(2000.0));
    }

    #[test]
    fn test_week52_falls_back_to_bars() {
        let data = chart(json!({ "symbol": "X" }), json!([101.0, 102.5, 103.0]));
        let history = parse_chart(data, "X").unwrap();

        // Third session has no high/low, so both fall back to its close.
        assert_eq!(history.fifty_two_week_high, Some(103.0));
        assert_eq!(history.fifty_two_week_low, Some(99.0));
    }

    #[test]
    fn test_not_found_error() {
        let data: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }))
        .unwrap();
        let err = parse_chart(data, "NOPE.NS").unwrap_err();
        assert!(matches!(err, SourceError::SymbolNotFound(s) if s == "NOPE.NS"));
    }

    #[test]
    fn test_other_api_error() {
        let data: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid range" }
            }
        }))
        .unwrap();
        let err = parse_chart(data, "X").unwrap_err();
        assert_eq!(err.to_string(), "Upstream error Bad Request: Invalid range");
    }
}
