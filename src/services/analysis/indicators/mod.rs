//! Technical indicator implementations.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use ema::EmaSet;
pub use macd::Macd;
pub use rsi::Rsi;
pub use volume::VolumeProfile;

use crate::error::AnalysisError;
use crate::types::Bar;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Reading produced by this indicator.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &'static str;

    /// Minimum number of bars required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the reading from a bar series.
    fn calculate(&self, bars: &[Bar]) -> Result<Self::Output, AnalysisError>;

    /// Fail with `InsufficientData` when `bars` is shorter than `min_periods`.
    fn ensure_periods(&self, bars: &[Bar]) -> Result<(), AnalysisError> {
        if bars.len() < self.min_periods() {
            return Err(AnalysisError::InsufficientData {
                indicator: self.id(),
                required: self.min_periods(),
                actual: bars.len(),
            });
        }
        Ok(())
    }
}
