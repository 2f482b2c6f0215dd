//! Benchmark index regime used as market context for scoring.

use tracing::debug;

use crate::error::AnalysisError;
use crate::services::analysis::math::{mean, round2, tail};
use crate::types::{BarSeries, MarketHealthReport, MarketStatus};

/// Sessions needed for the 20-session average.
pub const MIN_INDEX_BARS: usize = 20;

/// Classify the index from its last close, the day's change and its 20/50
/// session simple moving averages. The 50 average uses whatever history
/// exists when there are fewer than 50 sessions.
pub fn assess_market(index: &str, bars: &BarSeries) -> Result<MarketHealthReport, AnalysisError> {
    if bars.len() < MIN_INDEX_BARS {
        return Err(AnalysisError::InsufficientData {
            indicator: "market health",
            required: MIN_INDEX_BARS,
            actual: bars.len(),
        });
    }

    let closes = bars.closes();
    let current_price = closes[closes.len() - 1];
    let previous_close = closes[closes.len() - 2];
    if previous_close <= 0.0 {
        return Err(AnalysisError::Computation(format!(
            "non-positive previous close for {}",
            index
        )));
    }

    let change = current_price - previous_close;
    let change_percent = round2(change / previous_close * 100.0);
    let sma20 = mean(&tail(&closes, 20));
    let sma50 = mean(&tail(&closes, 50));
    let is_above_sma20 = current_price > sma20;
    let is_above_sma50 = current_price > sma50;

    let market_status = if is_above_sma20 && is_above_sma50 && change_percent > 0.0 {
        MarketStatus::Bullish
    } else if !is_above_sma20 && !is_above_sma50 && change_percent < 0.0 {
        MarketStatus::Bearish
    } else {
        MarketStatus::Neutral
    };

    debug!(index, ?market_status, change_percent, "market health assessed");

    Ok(MarketHealthReport {
        index: index.to_string(),
        current_price: round2(current_price),
        previous_close: round2(previous_close),
        change: round2(change),
        change_percent,
        sma20: round2(sma20),
        sma50: round2(sma50),
        is_above_sma20,
        is_above_sma50,
        market_status,
        recommendation: market_status.recommendation().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close + 10.0,
                low: close - 10.0,
                close,
                volume: 0.0,
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    fn ramp(count: usize, start: f64, step: f64) -> Vec<f64> {
        (0..count).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_rising_index_is_bullish() {
        let report = assess_market("^NSEI", &series(&ramp(60, 22000.0, 25.0))).unwrap();

        assert_eq!(report.market_status, MarketStatus::Bullish);
        assert!(report.is_above_sma20 && report.is_above_sma50);
        assert_eq!(report.change, 25.0);
        assert_eq!(report.recommendation, "Favorable for long trades");

        let health = report.to_health();
        assert_eq!(health.symbol, "^NSEI");
        assert!(health.is_bullish);
    }

    #[test]
    fn test_falling_index_is_bearish() {
        let report = assess_market("^NSEI", &series(&ramp(60, 24000.0, -30.0))).unwrap();

        assert_eq!(report.market_status, MarketStatus::Bearish);
        assert!(!report.is_above_sma20 && !report.is_above_sma50);
        assert!(report.change_percent < 0.0);
        assert!(!report.to_health().is_bullish);
    }

    #[test]
    fn test_down_day_in_uptrend_is_neutral() {
        let mut closes = ramp(60, 22000.0, 25.0);
        let last = closes[59];
        closes.push(last - 50.0);
        let report = assess_market("^NSEI", &series(&closes)).unwrap();

        // Still above both averages, but the session closed lower.
        assert_eq!(report.market_status, MarketStatus::Neutral);
        assert!(report.is_above_sma20 && report.is_above_sma50);
        assert_eq!(report.change, -50.0);
        assert_eq!(report.recommendation, "Mixed signals - be selective");
    }

    #[test]
    fn test_short_history_uses_available_sessions() {
        let report = assess_market("^NSEI", &series(&ramp(30, 100.0, 1.0))).unwrap();
        assert_eq!(report.sma20, 119.5);
        assert_eq!(report.sma50, 114.5);
    }

    #[test]
    fn test_too_few_sessions() {
        let err = assess_market("^NSEI", &series(&ramp(10, 100.0, 1.0))).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                indicator: "market health",
                required: MIN_INDEX_BARS,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_report_wire_format() {
        let report = assess_market("^NSEI", &series(&ramp(60, 22000.0, 25.0))).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["marketStatus"], "BULLISH");
        assert_eq!(value["isAbove20SMA"], true);
        assert_eq!(value["isAbove50SMA"], true);
        assert_eq!(value["changePercent"], report.change_percent);
    }
}
