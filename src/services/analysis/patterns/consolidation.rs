//! Tight-range bases and breakouts from them.

use super::SwingDetector;
use crate::services::analysis::math::mean;
use crate::types::{Bar, PatternKind, PatternMatch};

const MIN_PERIOD: usize = 10;
const MAX_PERIOD: usize = 20;
const MAX_RANGE_PCT: f64 = 8.0;
const TIGHT_RANGE_PCT: f64 = 6.0;
const BREAKOUT_VOLUME: f64 = 1.5;

pub struct ConsolidationDetector;

impl ConsolidationDetector {
    /// Check the base formed by the `period` bars before the current one.
    fn check_period(bars: &[Bar], period: usize) -> Option<PatternMatch> {
        let len = bars.len();
        let base = &bars[len - period - 1..len - 1];
        let current = &bars[len - 1];

        let high = base.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = base.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        if low <= 0.0 {
            return None;
        }
        let range_pct = (high - low) / low * 100.0;
        if range_pct >= MAX_RANGE_PCT {
            return None;
        }

        let volumes: Vec<f64> = base.iter().map(|b| b.volume).collect();
        let is_breakout =
            current.close > high && current.volume > mean(&volumes) * BREAKOUT_VOLUME;
        let target = high + (high - low);

        if is_breakout {
            return Some(
                PatternMatch::new(
                    PatternKind::ConsolidationBreakout,
                    format!(
                        "Breaking out of {}-day {:.1}% range on volume",
                        period, range_pct
                    ),
                )
                .with_breakout(true)
                .with_target(target),
            );
        }

        if range_pct < TIGHT_RANGE_PCT {
            return Some(
                PatternMatch::new(
                    PatternKind::TightRange,
                    format!(
                        "{}-day {:.1}% range between {:.2} and {:.2}",
                        period, range_pct, low, high
                    ),
                )
                .with_target(target),
            );
        }

        None
    }
}

impl SwingDetector for ConsolidationDetector {
    fn id(&self) -> &'static str {
        "consolidation"
    }

    fn min_bars(&self) -> usize {
        15
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        if bars.len() < self.min_bars() {
            return None;
        }

        (MIN_PERIOD..=MAX_PERIOD)
            .filter(|period| bars.len() >= period + 5)
            .find_map(|period| Self::check_period(bars, period))
    }
}
