//! Ascending and symmetrical triangles over the last 20 bars.

use super::{strict_swing_highs, strict_swing_lows, SwingDetector};
use crate::services::analysis::math::mean;
use crate::types::{Bar, PatternKind, PatternMatch};

const WINDOW: usize = 20;
const SWING_RADIUS: usize = 2;
const FLAT_TOLERANCE: f64 = 0.02;
const RISING_LOWS: f64 = 1.02;
const BREAKOUT_VOLUME: f64 = 1.5;

pub struct TriangleDetector;

impl SwingDetector for TriangleDetector {
    fn id(&self) -> &'static str {
        "triangle"
    }

    fn min_bars(&self) -> usize {
        15
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let window = &bars[bars.len().saturating_sub(WINDOW)..];
        let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = window.iter().map(|b| b.low).collect();

        let swing_highs = strict_swing_highs(&highs, SWING_RADIUS);
        let swing_lows = strict_swing_lows(&lows, SWING_RADIUS);
        if swing_highs.len() < 2 || swing_lows.len() < 2 {
            return None;
        }

        let (first_high, last_high) = (swing_highs[0].price, swing_highs[swing_highs.len() - 1].price);
        let (first_low, last_low) = (swing_lows[0].price, swing_lows[swing_lows.len() - 1].price);

        let flat_highs = (last_high - first_high).abs() / first_high < FLAT_TOLERANCE;
        let ascending_lows = last_low >= first_low * RISING_LOWS;
        let declining_highs = last_high < first_high;
        let rising_lows = last_low >= first_low;

        let resistance = swing_highs
            .iter()
            .map(|p| p.price)
            .fold(f64::NEG_INFINITY, f64::max);
        let current = &window[window.len() - 1];
        let prior_volumes: Vec<f64> = window[..window.len() - 1]
            .iter()
            .map(|b| b.volume)
            .collect();
        let is_breakout =
            current.close > resistance && current.volume > mean(&prior_volumes) * BREAKOUT_VOLUME;

        if flat_highs && ascending_lows {
            let description = format!(
                "Ascending triangle with resistance at {:.2}. {}",
                resistance,
                if is_breakout {
                    "Breakout confirmed"
                } else {
                    "Watch for breakout"
                }
            );
            return Some(
                PatternMatch::new(PatternKind::AscendingTriangle, description)
                    .with_breakout(is_breakout)
                    .with_target(resistance + (resistance - first_low)),
            );
        }

        if declining_highs && rising_lows {
            return Some(
                PatternMatch::new(
                    PatternKind::SymmetricalTriangle,
                    "Converging price action. Breakout direction will confirm trend.",
                )
                .with_breakout(is_breakout),
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::patterns::test_support::{bars_with_volumes, interpolate};
    use crate::types::PatternCategory;

    #[test]
    fn test_ascending_triangle() {
        let closes = interpolate(&[
            (0, 104.0),
            (3, 109.0),
            (6, 101.0),
            (9, 109.5),
            (12, 104.0),
            (15, 109.2),
            (17, 106.5),
            (19, 108.0),
        ]);
        assert_eq!(closes.len(), 20);
        let bars = bars_with_volumes(&closes, &vec![1000.0; 20]);

        let pattern = TriangleDetector.detect(&bars).unwrap();
        assert_eq!(pattern.kind, PatternKind::AscendingTriangle);
        assert!(!pattern.is_breakout);
        // Resistance 110.5, first swing low 100.
        assert!((pattern.target.unwrap() - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetrical_triangle() {
        let closes = interpolate(&[
            (0, 100.0),
            (3, 112.0),
            (6, 100.0),
            (9, 110.0),
            (12, 101.0),
            (15, 108.0),
            (17, 102.0),
            (19, 105.0),
        ]);
        let bars = bars_with_volumes(&closes, &vec![1000.0; 20]);

        let pattern = TriangleDetector.detect(&bars).unwrap();
        assert_eq!(pattern.kind, PatternKind::SymmetricalTriangle);
        assert_eq!(pattern.category, PatternCategory::Neutral);
        assert_eq!(pattern.target, None);
    }

    #[test]
    fn test_monotone_series_has_no_triangle() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bars = bars_with_volumes(&closes, &vec![1000.0; 20]);
        assert!(TriangleDetector.detect(&bars).is_none());
    }
}
