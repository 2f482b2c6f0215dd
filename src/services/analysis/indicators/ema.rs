//! Exponential Moving Average (EMA) family.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::{ema_series, round2, tail};
use crate::types::{Bar, EmaHistory, EmaReading};

const HISTORY_LEN: usize = 50;

/// Bars scanned back for a recent 9/21 crossover.
const RECENT_WINDOW: usize = 3;

/// EMA 9/20/21/50/200 with price position, alignment and 9/21 crossovers.
///
/// EMA-50 and EMA-200 are optional: they are reported only once the series
/// is long enough, and every flag depending on them reads false until then.
pub struct EmaSet {
    fast: usize,
    slow: usize,
}

impl Default for EmaSet {
    fn default() -> Self {
        Self { fast: 9, slow: 21 }
    }
}

impl EmaSet {
    fn distance(price: f64, ema: f64) -> f64 {
        round2((price - ema) / ema * 100.0)
    }

    fn last(values: &[f64]) -> Option<f64> {
        values.last().copied()
    }

    /// Fast/slow pair `k` bars back from the end (0 = current bar).
    fn pair_at(fast: &[f64], slow: &[f64], k: usize) -> Option<(f64, f64)> {
        let f = fast.len().checked_sub(k + 1).map(|i| fast[i])?;
        let s = slow.len().checked_sub(k + 1).map(|i| slow[i])?;
        Some((f, s))
    }

    fn crossed_up(older: (f64, f64), newer: (f64, f64)) -> bool {
        older.0 <= older.1 && newer.0 > newer.1
    }
}

impl Indicator for EmaSet {
    type Output = EmaReading;

    fn id(&self) -> &'static str {
        "ema"
    }

    /// Two slow EMA values are needed to detect a crossover.
    fn min_periods(&self) -> usize {
        self.slow + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Result<EmaReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price = closes[closes.len() - 1];

        let ema9 = ema_series(&closes, self.fast);
        let ema20 = ema_series(&closes, 20);
        let ema21 = ema_series(&closes, self.slow);
        let ema50 = ema_series(&closes, 50);
        let ema200 = ema_series(&closes, 200);

        let missing = || AnalysisError::Computation("EMA series is empty".to_string());
        let current9 = Self::last(&ema9).ok_or_else(missing)?;
        let current20 = Self::last(&ema20).ok_or_else(missing)?;
        let current21 = Self::last(&ema21).ok_or_else(missing)?;
        let current50 = Self::last(&ema50);
        let current200 = Self::last(&ema200);

        // EMA 9/21 crossover, aligned from the most recent bar
        let now = Self::pair_at(&ema9, &ema21, 0);
        let prev = Self::pair_at(&ema9, &ema21, 1);
        let (bullish_crossover, bearish_crossover) = match (prev, now) {
            (Some(p), Some(n)) => (Self::crossed_up(p, n), p.0 >= p.1 && n.0 < n.1),
            _ => (false, false),
        };

        let recent_crossover = (1..=RECENT_WINDOW).any(|k| {
            match (
                Self::pair_at(&ema9, &ema21, k),
                Self::pair_at(&ema9, &ema21, k - 1),
            ) {
                (Some(older), Some(newer)) => Self::crossed_up(older, newer),
                _ => false,
            }
        });

        Ok(EmaReading {
            ema9: current9,
            ema20: current20,
            ema21: current21,
            ema50: current50,
            ema200: current200,

            above_ema9: price > current9,
            above_ema20: price > current20,
            above_ema21: price > current21,
            above_ema50: current50.map_or(false, |e| price > e),
            above_ema200: current200.map_or(false, |e| price > e),

            ema9_above21: current9 > current21,
            bullish_crossover,
            bearish_crossover,
            recent_crossover,

            ema9_above20: current9 > current20,
            ema20_above50: current50.map_or(false, |e| current20 > e),
            ema50_above200: match (current50, current200) {
                (Some(e50), Some(e200)) => e50 > e200,
                _ => false,
            },

            distance_from_ema9: Self::distance(price, current9),
            distance_from_ema20: Self::distance(price, current20),
            distance_from_ema21: Self::distance(price, current21),
            distance_from_ema50: current50.map(|e| Self::distance(price, e)),
            distance_from_ema200: current200.map(|e| Self::distance(price, e)),

            history: EmaHistory {
                ema9: tail(&ema9, HISTORY_LEN),
                ema20: tail(&ema20, HISTORY_LEN),
                ema21: tail(&ema21, HISTORY_LEN),
                ema50: tail(&ema50, HISTORY_LEN),
            },
        })
    }
}
