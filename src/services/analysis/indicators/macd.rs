//! MACD (Moving Average Convergence Divergence) indicator.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::{ema_series, tail};
use crate::types::{Bar, MacdPoint, MacdReading};

const HISTORY_LEN: usize = 20;

/// Points scanned for a recent bullish crossover.
const RECENT_WINDOW: usize = 3;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// The line needs `slow` bars; the signal line needs `slow + signal - 1`.
/// Below that the signal-dependent fields are absent and every flag is false.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    /// MACD line aligned to the slow EMA (element 0 is bar `slow - 1`).
    fn macd_line(&self, closes: &[f64]) -> Vec<f64> {
        let fast_ema = ema_series(closes, self.fast_period);
        let slow_ema = ema_series(closes, self.slow_period);

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect()
    }

    /// Points where line, signal and histogram all exist.
    fn points(&self, macd_line: &[f64]) -> Vec<MacdPoint> {
        let signal_line = ema_series(macd_line, self.signal_period);
        let offset = self.signal_period.saturating_sub(1);

        signal_line
            .iter()
            .enumerate()
            .map(|(k, &signal)| {
                let macd = macd_line[k + offset];
                MacdPoint {
                    macd,
                    signal,
                    histogram: macd - signal,
                }
            })
            .collect()
    }

    /// Derive the reading from the current line value and the complete points.
    pub(crate) fn reading_from_points(macd: f64, points: &[MacdPoint]) -> MacdReading {
        let current = points.last();
        let previous = points.len().checked_sub(2).map(|i| &points[i]);

        let crossed_up = |prev: &MacdPoint, cur: &MacdPoint| {
            prev.macd <= prev.signal && cur.macd > cur.signal
        };

        let (bullish_crossover, bearish_crossover, histogram_increasing) =
            match (previous, current) {
                (Some(prev), Some(cur)) => (
                    crossed_up(prev, cur),
                    prev.macd >= prev.signal && cur.macd < cur.signal,
                    cur.histogram > prev.histogram,
                ),
                _ => (false, false, false),
            };

        let start = points.len().saturating_sub(RECENT_WINDOW + 1);
        let recent_bullish_crossover = points[start..]
            .windows(2)
            .any(|pair| crossed_up(&pair[0], &pair[1]));

        MacdReading {
            macd,
            signal: current.map(|p| p.signal),
            histogram: current.map(|p| p.histogram),
            history: tail(points, HISTORY_LEN),
            is_bullish: current.map_or(false, |p| p.macd > p.signal),
            bullish_crossover,
            bearish_crossover,
            recent_bullish_crossover,
            histogram_increasing,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn id(&self) -> &'static str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<MacdReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let macd_line = self.macd_line(&closes);
        let macd = *macd_line
            .last()
            .ok_or_else(|| AnalysisError::Computation("MACD line is empty".to_string()))?;

        Ok(Self::reading_from_points(macd, &self.points(&macd_line)))
    }
}
