//! Volume participation analysis.

use super::Indicator;
use crate::error::AnalysisError;
use crate::services::analysis::math::{mean, round2};
use crate::types::{Bar, VolumeReading, VolumeSignal};

/// Current volume against its trailing average.
///
/// The average includes the current bar. Flags use the raw ratio; the
/// reported ratio is rounded to two decimals.
pub struct VolumeProfile {
    period: usize,
}

impl Default for VolumeProfile {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl VolumeProfile {
    /// Ratio of current to average volume, zero when the average is not positive.
    pub fn ratio(current: f64, average: f64) -> f64 {
        if average > 0.0 {
            current / average
        } else {
            0.0
        }
    }
}

impl Indicator for VolumeProfile {
    type Output = VolumeReading;

    fn id(&self) -> &'static str {
        "volume"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<VolumeReading, AnalysisError> {
        self.ensure_periods(bars)?;

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let len = volumes.len();
        let average20 = mean(&volumes[len - self.period..]);
        let current = volumes[len - 1];
        let previous = if len > 1 { volumes[len - 2] } else { current };

        let ratio = Self::ratio(current, average20);

        let signal = if ratio > 1.5 {
            VolumeSignal::Strong
        } else if ratio > 1.2 {
            VolumeSignal::Moderate
        } else {
            VolumeSignal::Weak
        };

        Ok(VolumeReading {
            current,
            average20,
            ratio: round2(ratio),
            is_above_average: ratio > 1.2,
            is_high_volume: ratio > 1.5,
            is_very_high_volume: ratio > 2.0,
            is_increasing: current > previous,
            signal,
        })
    }
}
