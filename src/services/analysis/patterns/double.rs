//! Double bottom (W) and double top (M) over the last 40 bars.

use super::{dominant_highs, dominant_lows, SwingDetector, SwingPoint};
use crate::services::analysis::math::{max_of, min_of};
use crate::types::{Bar, PatternKind, PatternMatch};

const WINDOW: usize = 40;
const DOMINANCE_RADIUS: usize = 3;
const PRICE_TOLERANCE: f64 = 0.03;
const MIN_SEPARATION: usize = 5;

pub struct DoubleTopBottomDetector;

impl DoubleTopBottomDetector {
    /// The last two extrema, when they sit at a similar level far enough apart.
    fn matching_pair(points: &[SwingPoint]) -> Option<(SwingPoint, SwingPoint)> {
        if points.len() < 2 {
            return None;
        }
        let (a, b) = (points[points.len() - 2], points[points.len() - 1]);
        let price_diff = (a.price - b.price).abs() / a.price;
        let separation = b.index - a.index;

        if price_diff < PRICE_TOLERANCE && separation >= MIN_SEPARATION {
            Some((a, b))
        } else {
            None
        }
    }

    fn double_bottom(window: &[Bar]) -> Option<PatternMatch> {
        let lows: Vec<f64> = window.iter().map(|b| b.low).collect();
        let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
        let (a, b) = Self::matching_pair(&dominant_lows(&lows, DOMINANCE_RADIUS))?;

        let neckline = max_of(&highs[a.index..b.index]);
        let price = window[window.len() - 1].close;
        let is_breakout = price > neckline;
        let target = neckline + (neckline - a.price.min(b.price));

        let description = if is_breakout {
            format!(
                "W pattern with neckline at {:.2}. Breakout confirmed, target {:.2}",
                neckline, target
            )
        } else {
            format!(
                "W pattern with neckline at {:.2}. Watch for break above {:.2}",
                neckline, neckline
            )
        };

        Some(
            PatternMatch::new(PatternKind::DoubleBottom, description)
                .with_breakout(is_breakout)
                .with_target(target),
        )
    }

    fn double_top(window: &[Bar]) -> Option<PatternMatch> {
        let lows: Vec<f64> = window.iter().map(|b| b.low).collect();
        let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
        let (a, b) = Self::matching_pair(&dominant_highs(&highs, DOMINANCE_RADIUS))?;

        let neckline = min_of(&lows[a.index..b.index]);
        let price = window[window.len() - 1].close;
        let is_breakdown = price < neckline;
        let target = neckline - (a.price.max(b.price) - neckline);

        let description = if is_breakdown {
            format!("M pattern with neckline at {:.2}. Breakdown, avoid", neckline)
        } else {
            format!(
                "M pattern with neckline at {:.2}. Watch for support at {:.2}",
                neckline, neckline
            )
        };

        // For a top, `is_breakout` marks the breakdown through the neckline.
        Some(
            PatternMatch::new(PatternKind::DoubleTop, description)
                .with_breakout(is_breakdown)
                .with_target(target),
        )
    }
}

impl SwingDetector for DoubleTopBottomDetector {
    fn id(&self) -> &'static str {
        "double"
    }

    fn min_bars(&self) -> usize {
        30
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let window = &bars[bars.len().saturating_sub(WINDOW)..];
        Self::double_bottom(window).or_else(|| Self::double_top(window))
    }
}
