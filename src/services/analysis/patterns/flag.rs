//! Bull flag / pennant: a sharp pole followed by a tight, quiet consolidation.

use super::SwingDetector;
use crate::services::analysis::math::{max_of, mean, min_of};
use crate::types::{Bar, PatternKind, PatternMatch};

const LOOKBACK: usize = 20;
const MIN_POLE_BARS: usize = 5;
const MAX_POLE_BARS: usize = 10;
const MIN_POLE_MOVE_PCT: f64 = 10.0;
const MAX_RANGE_PCT: f64 = 8.0;
const TIGHT_RANGE_PCT: f64 = 5.0;
const VOLUME_DRY_UP: f64 = 0.7;
const BREAKOUT_VOLUME: f64 = 1.5;
const MEASURED_MOVE: f64 = 0.8;

pub struct FlagDetector;

struct Pole {
    start: usize,
    end: usize,
    move_pct: f64,
}

impl FlagDetector {
    /// Largest qualifying pole whose end leaves room for a consolidation.
    fn find_pole(closes: &[f64]) -> Option<Pole> {
        let len = closes.len();
        let mut best: Option<Pole> = None;

        for start in len - LOOKBACK..len - MIN_POLE_BARS {
            let last_end = (start + MAX_POLE_BARS).min(len - MIN_POLE_BARS);
            for end in start + MIN_POLE_BARS..=last_end {
                if closes[start] <= 0.0 {
                    continue;
                }
                let move_pct = (closes[end] - closes[start]) / closes[start] * 100.0;
                let improves = best.as_ref().map_or(true, |b| move_pct > b.move_pct);
                if move_pct >= MIN_POLE_MOVE_PCT && improves {
                    best = Some(Pole {
                        start,
                        end,
                        move_pct,
                    });
                }
            }
        }

        best
    }
}

impl SwingDetector for FlagDetector {
    fn id(&self) -> &'static str {
        "flag"
    }

    fn min_bars(&self) -> usize {
        LOOKBACK
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let len = bars.len();
        if len < LOOKBACK {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let pole = Self::find_pole(&closes)?;

        // Consolidation runs from the pole top up to, not including, the current bar.
        let consolidation = &closes[pole.end..len - 1];
        if consolidation.len() < 3 {
            return None;
        }

        let high = max_of(consolidation);
        let low = min_of(consolidation);
        let range_pct = (high - low) / low * 100.0;

        let consolidation_volume = mean(&volumes[pole.end..len - 1]);
        let pole_volume = mean(&volumes[pole.start..=pole.end]);
        let volume_dry_up = consolidation_volume < pole_volume * VOLUME_DRY_UP;

        if !(range_pct < MAX_RANGE_PCT && (volume_dry_up || range_pct < TIGHT_RANGE_PCT)) {
            return None;
        }

        let price = closes[len - 1];
        let is_breakout =
            price > high && volumes[len - 1] > consolidation_volume * BREAKOUT_VOLUME;
        let pole_height = closes[pole.end] - closes[pole.start];

        let description = format!(
            "Sharp {:.1}% move followed by {:.1}% consolidation. {}",
            pole.move_pct,
            range_pct,
            if is_breakout {
                "Breakout confirmed".to_string()
            } else {
                format!("Watch for breakout above {:.2}", high)
            }
        );

        Some(
            PatternMatch::new(PatternKind::FlagPennant, description)
                .with_breakout(is_breakout)
                .with_target(price + pole_height * MEASURED_MOVE),
        )
    }
}
