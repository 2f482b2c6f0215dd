//! Bollinger Bands indicator.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::{mean, round2};
use crate::types::{Bar, BollingerReading};

/// Tolerance for the near-band flags, as a fraction of the band value.
const BAND_TOLERANCE: f64 = 0.02;

/// Bollinger Bands.
///
/// - Middle Band = SMA(20)
/// - Upper Band = SMA + 2 * population standard deviation
/// - Lower Band = SMA - 2 * population standard deviation
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Population standard deviation around `mean`.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerReading;

    fn id(&self) -> &'static str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<BollingerReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let closes: Vec<f64> = bars[bars.len() - self.period..]
            .iter()
            .map(|b| b.close)
            .collect();
        let price = closes[closes.len() - 1];

        let middle = mean(&closes);
        let std_dev = Self::std_dev(&closes, middle);
        let upper = middle + self.std_dev_multiplier * std_dev;
        let lower = middle - self.std_dev_multiplier * std_dev;

        let width = upper - lower;
        let bandwidth = if middle != 0.0 {
            round2(width / middle * 100.0)
        } else {
            0.0
        };
        // Collapsed bands put price exactly mid-band.
        let percent_b = if width > 0.0 {
            round2((price - lower) / width * 100.0)
        } else {
            50.0
        };

        Ok(BollingerReading {
            upper,
            middle,
            lower,
            bandwidth,
            percent_b,
            near_lower: price <= lower * (1.0 + BAND_TOLERANCE),
            near_upper: price >= upper * (1.0 - BAND_TOLERANCE),
        })
    }
}
