//! Indicator computation and structural analysis over a daily bar series.

pub mod confluence;
pub mod indicators;
pub mod levels;
pub mod math;
pub mod patterns;
pub mod trend;

use crate::error::AnalysisError;
use crate::types::{Bar, IndicatorSnapshot};
use confluence::ConfluenceInputs;
use indicators::{Adx, Atr, BollingerBands, EmaSet, Indicator, Macd, Rsi, VolumeProfile};
use patterns::{detect_swing_patterns, CandlestickScanner};
use tracing::debug;

/// Bars required before any analysis runs.
pub const MIN_BARS: usize = 26;

/// Compute every reading for `bars`.
///
/// Fails with `InsufficientData` below [`MIN_BARS`]. Indicators with longer
/// windows either degrade (EMA50/EMA200 become `None`) or are dropped (ADX).
pub fn calculate_indicators(bars: &[Bar]) -> Result<IndicatorSnapshot, AnalysisError> {
    if bars.len() < MIN_BARS {
        return Err(AnalysisError::InsufficientData {
            indicator: "analysis",
            required: MIN_BARS,
            actual: bars.len(),
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let rsi = Rsi::default().calculate(bars)?;
    let macd = Macd::default().calculate(bars)?;
    let emas = EmaSet::default().calculate(bars)?;
    let adx = optional(Adx::default().calculate(bars))?;
    let volume = VolumeProfile::default().calculate(bars)?;
    let bollinger = BollingerBands::default().calculate(bars)?;
    let atr = Atr::default().calculate(bars)?;
    let candles = CandlestickScanner.calculate(bars)?;
    let swing_patterns = detect_swing_patterns(bars);
    let trend = trend::analyze_trend(&closes, &emas);
    let support_resistance = levels::find_levels(bars);

    let confluence = confluence::evaluate(&ConfluenceInputs {
        emas: &emas,
        rsi: &rsi,
        macd: &macd,
        volume: &volume,
        trend: &trend,
        levels: &support_resistance,
    });

    debug!(
        bars = bars.len(),
        rsi = rsi.current,
        adx = adx.as_ref().map(|a| a.adx),
        confluence = confluence.passed_count,
        "indicators calculated"
    );

    Ok(IndicatorSnapshot {
        current_price: closes[closes.len() - 1],
        previous_close: closes[closes.len() - 2],
        rsi,
        macd,
        emas,
        adx,
        volume,
        bollinger,
        atr,
        candles,
        swing_patterns,
        trend,
        support_resistance,
        confluence,
    })
}

/// Treat a short-history failure as an absent reading.
fn optional<T>(result: Result<T, AnalysisError>) -> Result<Option<T>, AnalysisError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalysisError::InsufficientData { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::test_support::{
        create_flat_bars, create_uptrend_bars,
    };

    #[test]
    fn test_gate_at_26_bars() {
        let err = calculate_indicators(&create_uptrend_bars(25)).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                indicator: "analysis",
                required: 26,
                actual: 25,
            }
        );
        assert!(calculate_indicators(&create_uptrend_bars(26)).is_ok());
    }

    #[test]
    fn test_short_history_drops_adx() {
        let snapshot = calculate_indicators(&create_uptrend_bars(26)).unwrap();
        assert!(snapshot.adx.is_none());
        assert!(snapshot.emas.ema50.is_none());

        let snapshot = calculate_indicators(&create_uptrend_bars(60)).unwrap();
        assert!(snapshot.adx.is_some());
        assert!(snapshot.emas.ema50.is_some());
    }

    #[test]
    fn test_snapshot_prices() {
        let bars = create_uptrend_bars(40);
        let snapshot = calculate_indicators(&bars).unwrap();
        assert_eq!(snapshot.current_price, bars[39].close);
        assert_eq!(snapshot.previous_close, bars[38].close);
        assert!(snapshot.swing_patterns.is_empty());
    }

    #[test]
    fn test_flat_series_is_well_defined() {
        let snapshot = calculate_indicators(&create_flat_bars(60, 50.0)).unwrap();
        assert_eq!(snapshot.rsi.current, 50.0);
        assert_eq!(snapshot.bollinger.percent_b, 50.0);
        assert_eq!(snapshot.volume.ratio, 1.0);
    }
}
