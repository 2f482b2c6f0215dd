//! Swing-point support and resistance.

use super::math::{round2, min_of, max_of};
use super::patterns::{strict_swing_highs, strict_swing_lows};
use crate::types::{Bar, SupportResistance};

const SWING_RADIUS: usize = 2;
const NEAR_SUPPORT: f64 = 0.02;
const LEVELS_KEPT: usize = 3;

/// Nearest support below and resistance above the last close.
///
/// Falls back to the series' lowest low / highest high when no swing point
/// lies on the relevant side of the price.
pub fn find_levels(bars: &[Bar]) -> SupportResistance {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let price = bars.last().map_or(0.0, |b| b.close);

    let mut support_levels: Vec<f64> = strict_swing_lows(&lows, SWING_RADIUS)
        .into_iter()
        .map(|p| p.price)
        .filter(|&low| low < price)
        .collect();
    support_levels.sort_by(|a, b| b.total_cmp(a));

    let mut resistance_levels: Vec<f64> = strict_swing_highs(&highs, SWING_RADIUS)
        .into_iter()
        .map(|p| p.price)
        .filter(|&high| high > price)
        .collect();
    resistance_levels.sort_by(|a, b| a.total_cmp(b));

    let nearest_support = support_levels.first().copied().unwrap_or_else(|| min_of(&lows));
    let nearest_resistance = resistance_levels
        .first()
        .copied()
        .unwrap_or_else(|| max_of(&highs));

    let (support_gap, resistance_gap) = if price > 0.0 {
        (
            (price - nearest_support) / price,
            (nearest_resistance - price) / price,
        )
    } else {
        (0.0, 0.0)
    };

    support_levels.truncate(LEVELS_KEPT);
    resistance_levels.truncate(LEVELS_KEPT);

    SupportResistance {
        nearest_support,
        nearest_resistance,
        support_levels,
        resistance_levels,
        near_support: support_gap < NEAR_SUPPORT,
        distance_to_support: round2(support_gap * 100.0),
        distance_to_resistance: round2(resistance_gap * 100.0),
    }
}
