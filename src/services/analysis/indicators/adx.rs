//! Average Directional Index (ADX) indicator.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::wilder_smooth;
use crate::types::{AdxReading, Bar};

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - 25 or below: Weak trend / ranging market
/// - Above 25: Trending
/// - Above 40: Strong trend
///
/// Combined with +DI and -DI for direction.
pub struct Adx {
    period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// True range of `current` given the previous bar.
pub(crate) fn true_range(current: &Bar, previous: &Bar) -> f64 {
    let hl = current.high - current.low;
    let hc = (current.high - previous.close).abs();
    let lc = (current.low - previous.close).abs();
    hl.max(hc).max(lc)
}

impl Adx {
    fn directional_index(dm: f64, tr: f64) -> f64 {
        if tr > 0.0 {
            dm / tr * 100.0
        } else {
            0.0
        }
    }
}

impl Indicator for Adx {
    type Output = AdxReading;

    fn id(&self) -> &'static str {
        "adx"
    }

    /// DI needs `period + 1` bars; ADX smooths `period` DX values on top.
    fn min_periods(&self) -> usize {
        self.period * 2
    }

    fn calculate(&self, bars: &[Bar]) -> Result<AdxReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let mut plus_dm = Vec::with_capacity(bars.len() - 1);
        let mut minus_dm = Vec::with_capacity(bars.len() - 1);
        let mut tr = Vec::with_capacity(bars.len() - 1);

        // Calculate DM and TR
        for pair in bars.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);

            let up_move = current.high - previous.high;
            let down_move = previous.low - current.low;

            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
            tr.push(true_range(current, previous));
        }

        let smoothed_plus_dm = wilder_smooth(&plus_dm, self.period);
        let smoothed_minus_dm = wilder_smooth(&minus_dm, self.period);
        let smoothed_tr = wilder_smooth(&tr, self.period);

        let dx_values: Vec<f64> = smoothed_tr
            .iter()
            .zip(smoothed_plus_dm.iter().zip(smoothed_minus_dm.iter()))
            .map(|(&atr, (&pdm, &mdm))| {
                let plus_di = Self::directional_index(pdm, atr);
                let minus_di = Self::directional_index(mdm, atr);
                let di_sum = plus_di + minus_di;
                if di_sum > 0.0 {
                    (plus_di - minus_di).abs() / di_sum * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        let adx = *wilder_smooth(&dx_values, self.period)
            .last()
            .ok_or_else(|| AnalysisError::Computation("ADX series is empty".to_string()))?;

        let last_tr = smoothed_tr.last().copied().unwrap_or(0.0);
        let plus_di =
            Self::directional_index(smoothed_plus_dm.last().copied().unwrap_or(0.0), last_tr);
        let minus_di =
            Self::directional_index(smoothed_minus_dm.last().copied().unwrap_or(0.0), last_tr);

        Ok(AdxReading::from_values(adx, plus_di, minus_di))
    }
}
