//! Average True Range (ATR) indicator.

use super::adx::true_range;
use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::{round2, wilder_smooth};
use crate::types::{AtrReading, Bar};

/// ATR (Average True Range) indicator.
///
/// Measures volatility. The scoring engine places stops two ATRs below and
/// targets three ATRs above the current price.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub const STOP_MULTIPLE: f64 = 2.0;
    pub const TARGET_MULTIPLE: f64 = 3.0;
}

impl Indicator for Atr {
    type Output = AtrReading;

    fn id(&self) -> &'static str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Result<AtrReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let true_ranges: Vec<f64> = bars
            .windows(2)
            .map(|pair| true_range(&pair[1], &pair[0]))
            .collect();

        let value = *wilder_smooth(&true_ranges, self.period)
            .last()
            .ok_or_else(|| AnalysisError::Computation("ATR series is empty".to_string()))?;
        let price = bars[bars.len() - 1].close;

        let percent = if price > 0.0 {
            round2(value / price * 100.0)
        } else {
            0.0
        };

        Ok(AtrReading {
            value,
            percent,
            suggested_stop_loss: price - value * Self::STOP_MULTIPLE,
            suggested_target: price + value * Self::TARGET_MULTIPLE,
        })
    }
}
