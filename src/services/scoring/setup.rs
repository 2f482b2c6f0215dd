//! ATR- and level-based trade setup.

use crate::error::AnalysisError;
use crate::services::analysis::math::{round1, round2};
use crate::types::{SupportResistance, TradeSetup};

const STOP_ATR: f64 = 2.0;
const TARGET1_ATR: f64 = 2.0;
const TARGET2_ATR: f64 = 3.0;
/// Levels are shaded 1% toward the price.
const LEVEL_BUFFER: f64 = 0.99;

/// Entry at the current price, stop and targets bounded by nearby levels.
///
/// Prices are rounded to two decimals first; percentages and the ratio are
/// derived from the rounded prices so they can be recomputed from the result.
pub fn trade_setup(
    price: f64,
    atr: f64,
    levels: &SupportResistance,
) -> Result<TradeSetup, AnalysisError> {
    let entry = round2(price);
    let stop_loss = round2((price - atr * STOP_ATR).max(levels.nearest_support * LEVEL_BUFFER));
    let target1 = round2(price + atr * TARGET1_ATR);
    let target2 =
        round2((price + atr * TARGET2_ATR).min(levels.nearest_resistance * LEVEL_BUFFER));

    let risk = entry - stop_loss;
    if entry <= 0.0 || risk <= 0.0 {
        return Err(AnalysisError::Computation(format!(
            "non-positive trade risk (entry {:.2}, stop {:.2})",
            entry, stop_loss
        )));
    }
    let reward = target2 - entry;
    let risk_percent = risk / entry * 100.0;

    Ok(TradeSetup {
        entry,
        stop_loss,
        target1,
        target2,
        risk_percent: round2(risk_percent),
        reward_percent: round2(reward / entry * 100.0),
        risk_reward_ratio: round2(reward / risk),
        position_size_note: format!("Risk {:.1}% per trade", round1(risk_percent)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(support: f64, resistance: f64) -> SupportResistance {
        SupportResistance {
            nearest_support: support,
            nearest_resistance: resistance,
            support_levels: vec![support],
            resistance_levels: vec![resistance],
            near_support: false,
            distance_to_support: 0.0,
            distance_to_resistance: 0.0,
        }
    }

    #[test]
    fn test_support_tightens_stop() {
        let setup = trade_setup(110.0, 2.0, &levels(108.0, 125.0)).unwrap();
        assert_eq!(setup.entry, 110.0);
        // max(106, 106.92)
        assert_eq!(setup.stop_loss, 106.92);
        assert_eq!(setup.target1, 114.0);
        // min(116, 123.75)
        assert_eq!(setup.target2, 116.0);
        assert_eq!(setup.risk_percent, 2.8);
        assert_eq!(setup.reward_percent, 5.45);
        assert_eq!(setup.risk_reward_ratio, 1.95);
        assert_eq!(setup.position_size_note, "Risk 2.8% per trade");
    }

    #[test]
    fn test_resistance_caps_target() {
        let setup = trade_setup(100.0, 3.0, &levels(80.0, 105.0)).unwrap();
        assert_eq!(setup.stop_loss, 94.0);
        assert_eq!(setup.target2, 103.95);
        assert_eq!(setup.risk_reward_ratio, 0.66);
    }

    #[test]
    fn test_ratio_matches_returned_prices() {
        let setup = trade_setup(123.457, 1.913, &levels(119.3, 140.2)).unwrap();
        let recomputed = (setup.target2 - setup.entry) / (setup.entry - setup.stop_loss);
        assert_eq!(setup.risk_reward_ratio, round2(recomputed));
    }

    #[test]
    fn test_zero_risk_is_an_error() {
        // Flat series: ATR 0 and support at the price.
        let err = trade_setup(50.0, 0.0, &levels(50.0, 50.0)).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
    }
}
