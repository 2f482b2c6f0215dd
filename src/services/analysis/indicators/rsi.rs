//! Relative Strength Index (RSI) indicator.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::tail;
use crate::types::{Bar, RsiReading};

/// Points of RSI history kept in the reading.
const HISTORY_LEN: usize = 20;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - 40-60: Swing zone, room to run in either direction
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // A flat window has no momentum either way.
            return if avg_gain == 0.0 { 50.0 } else { 100.0 };
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }

    /// Wilder-smoothed RSI for every bar from index `period` onwards.
    pub fn series(closes: &[f64], period: usize) -> Vec<f64> {
        if period == 0 || closes.len() < period + 1 {
            return Vec::new();
        }

        let mut gains = Vec::with_capacity(closes.len() - 1);
        let mut losses = Vec::with_capacity(closes.len() - 1);

        for window in closes.windows(2) {
            let change = window[1] - window[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        // Calculate initial averages
        let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
        let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;

        let mut values = Vec::with_capacity(gains.len() - period + 1);
        values.push(Self::value(avg_gain, avg_loss));

        // Use smoothed averages for remaining data
        for i in period..gains.len() {
            avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
            values.push(Self::value(avg_gain, avg_loss));
        }

        values
    }
}

impl Indicator for Rsi {
    type Output = RsiReading;

    fn id(&self) -> &'static str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Result<RsiReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let values = Self::series(&closes, self.period);
        let current = *values
            .last()
            .ok_or_else(|| AnalysisError::Computation("RSI series is empty".to_string()))?;
        let previous = values.len().checked_sub(2).map(|i| values[i]);

        Ok(RsiReading::from_values(
            current,
            previous,
            tail(&values, HISTORY_LEN),
        ))
    }
}
