//! Candlestick patterns on the last three bars.

use crate::error::AnalysisError;
use crate::services::analysis::indicators::Indicator;
use crate::services::analysis::math::round2;
use crate::types::{Bar, CandlestickReading, CurrentCandle, PatternKind, PatternMatch};

/// Scans the most recent bars for single- and multi-candle reversal shapes.
///
/// Several shapes can match the same bar (a bullish marubozu that also
/// engulfs the prior candle, for instance); all of them are reported.
#[derive(Default)]
pub struct CandlestickScanner;

impl CandlestickScanner {
    fn bullish_engulfing(previous: &Bar, current: &Bar) -> bool {
        current.is_bullish()
            && previous.is_bearish()
            && current.open < previous.close
            && current.close > previous.open
    }

    fn hammer(bar: &Bar) -> bool {
        let body = bar.body_size();
        bar.lower_wick() > body * 2.0 && bar.upper_wick() < body * 0.5 && bar.body() > 0.0
    }

    fn inverted_hammer(bar: &Bar) -> bool {
        let body = bar.body_size();
        bar.upper_wick() > body * 2.0 && bar.lower_wick() < body * 0.5 && bar.body() > 0.0
    }

    fn doji(bar: &Bar) -> bool {
        bar.body_size() < bar.range() * 0.1
    }

    fn morning_star(first: &Bar, middle: &Bar, current: &Bar) -> bool {
        first.is_bearish()
            && middle.body_size() < first.range() * 0.3
            && current.is_bullish()
            && current.close > (first.open + first.close) / 2.0
    }

    fn bullish_marubozu(bar: &Bar) -> bool {
        let body = bar.body_size();
        bar.body() > 0.0 && bar.upper_wick() < body * 0.1 && bar.lower_wick() < body * 0.1
    }

    fn current_candle(bar: &Bar) -> CurrentCandle {
        let range = bar.range();
        CurrentCandle {
            is_bullish: bar.body() > 0.0,
            body_percent: if range > 0.0 {
                round2(bar.body_size() / range * 100.0)
            } else {
                0.0
            },
        }
    }
}

impl Indicator for CandlestickScanner {
    type Output = CandlestickReading;

    fn id(&self) -> &'static str {
        "candlesticks"
    }

    fn min_periods(&self) -> usize {
        3
    }

    fn calculate(&self, bars: &[Bar]) -> Result<CandlestickReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let len = bars.len();
        let (first, previous, current) = (&bars[len - 3], &bars[len - 2], &bars[len - 1]);
        let mut patterns = Vec::new();

        if Self::bullish_engulfing(previous, current) {
            patterns.push(PatternMatch::new(
                PatternKind::BullishEngulfing,
                "Bullish body engulfs the prior bearish body",
            ));
        }
        if Self::hammer(current) {
            patterns.push(PatternMatch::new(
                PatternKind::Hammer,
                "Long lower wick rejected lower prices",
            ));
        }
        if Self::inverted_hammer(current) {
            patterns.push(PatternMatch::new(
                PatternKind::InvertedHammer,
                "Long upper wick after a bullish close",
            ));
        }
        if Self::doji(current) {
            patterns.push(PatternMatch::new(
                PatternKind::Doji,
                "Open and close nearly equal, indecision",
            ));
        }
        if Self::morning_star(first, previous, current) {
            patterns.push(PatternMatch::new(
                PatternKind::MorningStar,
                "Three-candle bullish reversal",
            ));
        }
        if Self::bullish_marubozu(current) {
            patterns.push(PatternMatch::new(
                PatternKind::BullishMarubozu,
                "Full bullish body with almost no wicks",
            ));
        }

        Ok(CandlestickReading::new(
            patterns,
            Self::current_candle(current),
        ))
    }
}
