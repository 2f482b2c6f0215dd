//! Trend direction from the EMA stack and the 20-bar change.

use super::math::{percent_change, round2};
use crate::types::{EmaReading, TrendAnalysis, TrendDirection, TrendStrength};

const LOOKBACK: usize = 20;

pub fn analyze_trend(closes: &[f64], emas: &EmaReading) -> TrendAnalysis {
    let recent = &closes[closes.len().saturating_sub(LOOKBACK)..];
    let change = match (recent.first(), recent.last()) {
        (Some(&start), Some(&end)) => percent_change(start, end),
        _ => 0.0,
    };
    let price = closes.last().copied().unwrap_or(0.0);

    let ema_trend_aligned = emas.above_ema50 && emas.ema50_above200;
    let is_uptrend = ema_trend_aligned && change > 0.0;
    let is_downtrend = match (emas.ema50, emas.ema200) {
        (Some(ema50), Some(ema200)) => price < ema50 && ema50 < ema200 && change < 0.0,
        _ => false,
    };

    let direction = if is_uptrend {
        TrendDirection::Up
    } else if is_downtrend {
        TrendDirection::Down
    } else {
        TrendDirection::Sideways
    };

    TrendAnalysis {
        direction,
        strength: TrendStrength::classify(change.abs(), 10.0, 5.0),
        change20_day: round2(change),
        is_uptrend,
        is_downtrend,
        is_sideways: !is_uptrend && !is_downtrend,
        ema_trend_aligned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::test_support::{
        bars_from_closes, create_downtrend_bars, create_flat_bars, create_uptrend_bars,
    };
    use crate::services::analysis::indicators::{EmaSet, Indicator};
    use crate::types::Bar;

    fn trend_of(bars: &[Bar]) -> TrendAnalysis {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let emas = EmaSet::default().calculate(bars).unwrap();
        analyze_trend(&closes, &emas)
    }

    #[test]
    fn test_uptrend() {
        let trend = trend_of(&create_uptrend_bars(220));
        assert_eq!(trend.direction, TrendDirection::Up);
        assert!(trend.ema_trend_aligned);
        // 401 -> 429.5 over the last 20 bars.
        assert_eq!(trend.strength, TrendStrength::Moderate);
        assert!(trend.change20_day > 0.0);
    }

    #[test]
    fn test_uptrend_needs_ema200() {
        // 60 bars: EMA50 exists, EMA200 does not.
        let trend = trend_of(&create_uptrend_bars(60));
        assert_eq!(trend.direction, TrendDirection::Sideways);
        assert!(!trend.ema_trend_aligned);
    }

    #[test]
    fn test_downtrend() {
        let closes: Vec<f64> = (0..220).map(|i| 400.0 - 1.5 * i as f64).collect();
        let trend = trend_of(&bars_from_closes(&closes, 1000.0));
        assert_eq!(trend.direction, TrendDirection::Down);
        assert!(trend.is_downtrend);
        assert!(!trend.ema_trend_aligned);
        assert!(trend.change20_day < 0.0);
    }

    #[test]
    fn test_downtrend_needs_ema200() {
        let trend = trend_of(&create_downtrend_bars(120));
        assert!(!trend.is_downtrend);
        assert!(trend.is_sideways);
    }

    #[test]
    fn test_flat_is_weak_sideways() {
        let trend = trend_of(&create_flat_bars(60, 50.0));
        assert_eq!(trend.direction, TrendDirection::Sideways);
        assert_eq!(trend.strength, TrendStrength::Weak);
        assert_eq!(trend.change20_day, 0.0);
    }
}
