//! Candlestick and swing-structure pattern detection.

pub mod candles;
pub mod consolidation;
pub mod double;
pub mod flag;
pub mod triangle;

pub use candles::CandlestickScanner;
pub use consolidation::ConsolidationDetector;
pub use double::DoubleTopBottomDetector;
pub use flag::FlagDetector;
pub use triangle::TriangleDetector;

use crate::types::{Bar, PatternMatch};
use tracing::debug;

/// A swing/price-structure pattern detector.
pub trait SwingDetector: Send + Sync {
    /// Unique identifier for this detector.
    fn id(&self) -> &'static str;

    /// Minimum number of bars before the detector will look at a series.
    fn min_bars(&self) -> usize;

    /// Look for the pattern ending at the most recent bar.
    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch>;
}

/// Get all swing detectors, in detection order.
pub fn all_detectors() -> Vec<Box<dyn SwingDetector>> {
    vec![
        Box::new(FlagDetector),
        Box::new(TriangleDetector),
        Box::new(DoubleTopBottomDetector),
        Box::new(ConsolidationDetector),
    ]
}

/// Run every swing detector over `bars`.
pub fn detect_swing_patterns(bars: &[Bar]) -> Vec<PatternMatch> {
    all_detectors()
        .iter()
        .filter(|d| bars.len() >= d.min_bars())
        .filter_map(|d| {
            let found = d.detect(bars);
            if let Some(ref pattern) = found {
                debug!(
                    detector = d.id(),
                    pattern = pattern.name.as_str(),
                    breakout = pattern.is_breakout,
                    "swing pattern detected"
                );
            }
            found
        })
        .collect()
}

/// A local extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
}

/// Points strictly above the `radius` values on each side.
pub fn strict_swing_highs(values: &[f64], radius: usize) -> Vec<SwingPoint> {
    strict_swings(values, radius, |v, n| v > n)
}

/// Points strictly below the `radius` values on each side.
pub fn strict_swing_lows(values: &[f64], radius: usize) -> Vec<SwingPoint> {
    strict_swings(values, radius, |v, n| v < n)
}

fn strict_swings(values: &[f64], radius: usize, beats: impl Fn(f64, f64) -> bool) -> Vec<SwingPoint> {
    if values.len() < 2 * radius + 1 {
        return Vec::new();
    }

    (radius..values.len() - radius)
        .filter(|&i| {
            (1..=radius).all(|d| beats(values[i], values[i - d]) && beats(values[i], values[i + d]))
        })
        .map(|i| SwingPoint {
            index: i,
            price: values[i],
        })
        .collect()
}

/// Points equal to the maximum of the window `radius` bars either side.
pub fn dominant_highs(values: &[f64], radius: usize) -> Vec<SwingPoint> {
    dominant(values, radius, |window| {
        window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Points equal to the minimum of the window `radius` bars either side.
pub fn dominant_lows(values: &[f64], radius: usize) -> Vec<SwingPoint> {
    dominant(values, radius, |window| {
        window.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

fn dominant(values: &[f64], radius: usize, extreme: impl Fn(&[f64]) -> f64) -> Vec<SwingPoint> {
    if values.len() < 2 * radius + 1 {
        return Vec::new();
    }

    (radius..values.len() - radius)
        .filter(|&i| values[i] == extreme(&values[i - radius..=i + radius]))
        .map(|i| SwingPoint {
            index: i,
            price: values[i],
        })
        .collect()
}
