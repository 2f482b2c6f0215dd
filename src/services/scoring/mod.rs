//! Ten-factor swing score over a daily bar series.
//!
//! [`score`] is a pure function: the same input always yields the same
//! [`ScoreResult`], and nothing is cached between calls.

pub mod factors;
pub mod reasons;
pub mod setup;

use crate::error::AnalysisError;
use crate::services::analysis::math::{percent_change, round1, round2};
use crate::services::analysis::{calculate_indicators, MIN_BARS};
use crate::types::{
    sort_for_display, Breakdown, Factor, IndicatorSnapshot, IndicatorSummary, MarketHealth,
    ScoreInput, ScoreResult, Signal,
};
use tracing::debug;

/// Score one instrument.
///
/// Short histories yield `INSUFFICIENT_DATA`; any failure while computing
/// yields `ERROR`. Both come back with a zero score and an empty breakdown.
pub fn score(input: &ScoreInput, market_health: Option<&MarketHealth>) -> ScoreResult {
    analyze(input, market_health).0
}

/// Score one instrument and keep the full readings it was scored from.
///
/// The snapshot is `None` whenever the result is not scored.
pub fn analyze(
    input: &ScoreInput,
    market_health: Option<&MarketHealth>,
) -> (ScoreResult, Option<IndicatorSnapshot>) {
    if let Some(health) = market_health {
        debug!(
            index = health.symbol.as_str(),
            change = health.change_percent,
            bullish = health.is_bullish,
            "market health supplied"
        );
    }

    let bars = input.bars.bars();
    if bars.len() < MIN_BARS {
        let err = AnalysisError::InsufficientData {
            indicator: "analysis",
            required: MIN_BARS,
            actual: bars.len(),
        };
        return (
            ScoreResult::failed(Signal::InsufficientData, err.to_string()),
            None,
        );
    }

    let result = calculate_indicators(bars).and_then(|snapshot| {
        score_snapshot(&snapshot, input.week52()).map(|result| (result, snapshot))
    });

    match result {
        Ok((result, snapshot)) => (result, Some(snapshot)),
        Err(err @ AnalysisError::InsufficientData { .. }) => (
            ScoreResult::failed(Signal::InsufficientData, err.to_string()),
            None,
        ),
        Err(err) => {
            debug!(error = %err, "scoring failed");
            (ScoreResult::failed(Signal::Error, err.to_string()), None)
        }
    }
}

/// Score precomputed readings. `week52` is `(high, low)`.
pub fn score_snapshot(
    snapshot: &IndicatorSnapshot,
    week52: Option<(f64, f64)>,
) -> Result<ScoreResult, AnalysisError> {
    let price = snapshot.current_price;
    let trade_setup = setup::trade_setup(price, snapshot.atr.value, &snapshot.support_resistance)?;

    let mut breakdown = Breakdown::new();
    breakdown.insert(
        Factor::Trend,
        factors::score_trend(&snapshot.emas, &snapshot.trend),
    );
    breakdown.insert(Factor::Rsi, factors::score_rsi(&snapshot.rsi));
    breakdown.insert(Factor::Macd, factors::score_macd(&snapshot.macd));
    breakdown.insert(Factor::Volume, factors::score_volume(&snapshot.volume));
    breakdown.insert(Factor::Pattern, factors::score_pattern(&snapshot.candles));
    breakdown.insert(
        Factor::Support,
        factors::score_support(&snapshot.emas, &snapshot.support_resistance),
    );
    breakdown.insert(Factor::Adx, factors::score_adx(snapshot.adx.as_ref()));
    breakdown.insert(Factor::Sector, factors::score_sector());
    breakdown.insert(Factor::Week52, factors::score_week52(price, week52));
    breakdown.insert(
        Factor::RiskReward,
        factors::score_risk_reward(&trade_setup),
    );

    let total: f64 = breakdown.values().map(|f| f.score).sum();
    let score = round1(total);
    if !score.is_finite() {
        return Err(AnalysisError::Computation(format!(
            "non-finite score {}",
            total
        )));
    }

    let signal = Signal::from_score(score);
    let signal_reasons = reasons::signal_reasons(&breakdown, score);

    let mut patterns = snapshot.candles.patterns.clone();
    patterns.extend(snapshot.swing_patterns.iter().cloned());
    sort_for_display(&mut patterns);

    debug!(
        score,
        signal = ?signal,
        patterns = patterns.len(),
        confluence = snapshot.confluence.passed_count,
        "scored"
    );

    Ok(ScoreResult {
        score,
        max_score: ScoreResult::MAX_SCORE,
        signal,
        confidence: signal.confidence(),
        signal_text: signal.text().to_string(),
        signal_reasons: Some(signal_reasons),
        breakdown,
        indicators: Some(IndicatorSummary {
            rsi: snapshot.rsi.current,
            macd_histogram: snapshot.macd.histogram_or_zero(),
            macd_bullish: snapshot.macd.is_bullish,
            volume_ratio: snapshot.volume.ratio,
            adx: snapshot.adx.as_ref().map(|a| a.adx),
            trend: snapshot.trend.direction,
            ema50: snapshot.emas.ema50,
            ema200: snapshot.emas.ema200,
        }),
        trade_setup: Some(trade_setup),
        current_price: Some(price),
        price_change: Some(round2(percent_change(snapshot.previous_close, price))),
        patterns,
        confluence: Some(snapshot.confluence.clone()),
        error: None,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::services::analysis::confluence::{self, ConfluenceInputs};
    use crate::types::*;

    /// Readings of a clean pullback-and-go long setup; scores 8.3.
    pub fn bullish_snapshot() -> IndicatorSnapshot {
        let rsi = RsiReading::from_values(55.0, Some(52.0), vec![52.0, 55.0]);
        let macd = MacdReading {
            macd: 0.8,
            signal: Some(0.5),
            histogram: Some(0.3),
            history: vec![
                MacdPoint {
                    macd: 0.4,
                    signal: 0.45,
                    histogram: -0.05,
                },
                MacdPoint {
                    macd: 0.8,
                    signal: 0.5,
                    histogram: 0.3,
                },
            ],
            is_bullish: true,
            bullish_crossover: true,
            bearish_crossover: false,
            recent_bullish_crossover: true,
            histogram_increasing: true,
        };
        let emas = EmaReading {
            ema9: 109.5,
            ema20: 109.0,
            ema21: 108.8,
            ema50: Some(100.0),
            ema200: Some(90.0),
            above_ema9: true,
            above_ema20: true,
            above_ema21: true,
            above_ema50: true,
            above_ema200: true,
            ema9_above21: true,
            bullish_crossover: false,
            bearish_crossover: false,
            recent_crossover: false,
            ema9_above20: true,
            ema20_above50: true,
            ema50_above200: true,
            distance_from_ema9: 0.46,
            distance_from_ema20: 0.92,
            distance_from_ema21: 1.1,
            distance_from_ema50: Some(10.0),
            distance_from_ema200: Some(22.22),
            history: EmaHistory::default(),
        };
        let volume = VolumeReading {
            current: 1800.0,
            average20: 1000.0,
            ratio: 1.8,
            is_above_average: true,
            is_high_volume: true,
            is_very_high_volume: false,
            is_increasing: true,
            signal: VolumeSignal::Strong,
        };
        let trend = TrendAnalysis {
            direction: TrendDirection::Up,
            strength: TrendStrength::Moderate,
            change20_day: 6.0,
            is_uptrend: true,
            is_downtrend: false,
            is_sideways: false,
            ema_trend_aligned: true,
        };
        let support_resistance = SupportResistance {
            nearest_support: 108.0,
            nearest_resistance: 125.0,
            support_levels: vec![108.0, 104.0],
            resistance_levels: vec![125.0],
            near_support: true,
            distance_to_support: 1.82,
            distance_to_resistance: 13.64,
        };
        let confluence = confluence::evaluate(&ConfluenceInputs {
            emas: &emas,
            rsi: &rsi,
            macd: &macd,
            volume: &volume,
            trend: &trend,
            levels: &support_resistance,
        });

        IndicatorSnapshot {
            current_price: 110.0,
            previous_close: 108.0,
            rsi,
            macd,
            emas,
            adx: Some(AdxReading::from_values(45.0, 30.0, 12.0)),
            volume,
            bollinger: BollingerReading {
                upper: 114.0,
                middle: 106.0,
                lower: 98.0,
                bandwidth: 15.09,
                percent_b: 75.0,
                near_lower: false,
                near_upper: false,
            },
            atr: AtrReading {
                value: 2.0,
                percent: 1.82,
                suggested_stop_loss: 106.0,
                suggested_target: 116.0,
            },
            candles: CandlestickReading::new(
                vec![PatternMatch::new(
                    PatternKind::BullishEngulfing,
                    "Bullish body engulfs the prior bearish body",
                )],
                CurrentCandle {
                    is_bullish: true,
                    body_percent: 80.0,
                },
            ),
            swing_patterns: Vec::new(),
            trend,
            support_resistance,
            confluence,
        }
    }

    pub fn setup_with_ratio(ratio: f64) -> TradeSetup {
        TradeSetup {
            entry: 100.0,
            stop_loss: 98.0,
            target1: 104.0,
            target2: 100.0 + 2.0 * ratio,
            risk_percent: 2.0,
            reward_percent: 2.0 * ratio,
            risk_reward_ratio: ratio,
            position_size_note: "Risk 2.0% per trade".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::bullish_snapshot;
    use super::*;
    use crate::services::analysis::indicators::test_support::{
        create_flat_bars, create_uptrend_bars,
    };
    use crate::types::{
        BarSeries, Confidence, PatternKind, PatternMatch, ReasonTone, TrendDirection,
    };

    #[test]
    fn test_bullish_snapshot_is_strong_buy() {
        let result = score_snapshot(&bullish_snapshot(), Some((130.0, 80.0))).unwrap();

        assert_eq!(result.score, 8.3);
        assert_eq!(result.signal, Signal::StrongBuy);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.breakdown.len(), 10);
        assert_eq!(result.breakdown[&Factor::Volume].score, 1.2);
        assert_eq!(result.breakdown[&Factor::RiskReward].score, 0.4);
        assert_eq!(result.price_change, Some(1.85));

        let reasons = result.signal_reasons.unwrap();
        assert_eq!(reasons.tone, ReasonTone::Bullish);
        assert_eq!(reasons.title, "Strong Setup");
        assert_eq!(reasons.items.len(), 4);

        let setup = result.trade_setup.unwrap();
        assert_eq!(setup.stop_loss, 106.92);
        assert_eq!(setup.risk_reward_ratio, 1.95);
    }

    #[test]
    fn test_missing_week52_costs_half_a_point() {
        let result = score_snapshot(&bullish_snapshot(), None).unwrap();
        assert_eq!(result.score, 7.8);
        assert_eq!(result.signal, Signal::Buy);
    }

    #[test]
    fn test_bearish_snapshot_is_avoid() {
        let mut snapshot = bullish_snapshot();
        snapshot.rsi = crate::types::RsiReading::from_values(75.0, Some(72.0), vec![]);
        snapshot.macd.is_bullish = false;
        snapshot.macd.bullish_crossover = false;
        snapshot.macd.recent_bullish_crossover = false;
        snapshot.volume.ratio = 0.9;
        snapshot.volume.is_above_average = false;
        snapshot.volume.is_high_volume = false;
        snapshot.emas.above_ema20 = false;
        snapshot.emas.above_ema50 = false;
        snapshot.emas.ema50_above200 = false;
        snapshot.trend.is_uptrend = false;
        snapshot.trend.direction = TrendDirection::Sideways;
        snapshot.adx = None;
        snapshot.support_resistance.near_support = false;
        snapshot.candles.has_bullish_pattern = false;
        snapshot.candles.has_strong_bullish_pattern = false;
        snapshot.candles.current_candle.is_bullish = false;

        let result = score_snapshot(&snapshot, Some((112.0, 80.0))).unwrap();
        // Volume 0.3 and R:R 0.4 only.
        assert_eq!(result.score, 0.7);
        assert_eq!(result.signal, Signal::Avoid);
        assert_eq!(result.confidence, Confidence::NoConfidence);
        assert_eq!(result.signal_reasons.unwrap().tone, ReasonTone::Bearish);
    }

    #[test]
    fn test_patterns_sorted_for_display() {
        let mut snapshot = bullish_snapshot();
        snapshot.candles.patterns.insert(0, PatternMatch::new(PatternKind::Doji, ""));
        snapshot
            .swing_patterns
            .push(PatternMatch::new(PatternKind::DoubleTop, ""));
        snapshot
            .swing_patterns
            .push(PatternMatch::new(PatternKind::FlagPennant, ""));

        let result = score_snapshot(&snapshot, None).unwrap();
        let kinds: Vec<PatternKind> = result.patterns.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PatternKind::BullishEngulfing,
                PatternKind::FlagPennant,
                PatternKind::DoubleTop,
                PatternKind::Doji,
            ]
        );
        assert_eq!(
            result.display_pattern().map(|p| p.kind),
            Some(PatternKind::BullishEngulfing)
        );
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let bars = BarSeries::new(create_uptrend_bars(15)).unwrap();
        let result = score(&ScoreInput::new(bars), None);
        assert_eq!(result.signal, Signal::InsufficientData);
        assert_eq!(result.score, 0.0);
        assert!(result.breakdown.is_empty());
        assert_eq!(
            result.error.as_deref(),
            Some("Insufficient data for analysis: need at least 26 bars, have 15")
        );
    }

    #[test]
    fn test_degenerate_series_is_error() {
        let bars = BarSeries::new(create_flat_bars(60, 50.0)).unwrap();
        let result = score(&ScoreInput::new(bars), None);
        assert_eq!(result.signal, Signal::Error);
        assert_eq!(result.score, 0.0);
        assert!(result.breakdown.is_empty());
        assert!(result.trade_setup.is_none());
        assert!(result.error.unwrap().contains("non-positive trade risk"));
    }

    #[test]
    fn test_score_is_sum_of_factors() {
        let bars = BarSeries::new(create_uptrend_bars(80)).unwrap();
        let result = score(&ScoreInput::new(bars), None);
        assert!(result.signal.is_scored());
        let sum: f64 = result.breakdown.values().map(|f| f.score).sum();
        assert_eq!(result.score, round1(sum));
        assert!((0.0..=10.0).contains(&result.score));
    }

    #[test]
    fn test_analyze_keeps_snapshot_only_when_scored() {
        let bars = BarSeries::new(create_uptrend_bars(80)).unwrap();
        let input = ScoreInput::new(bars);
        let (result, snapshot) = analyze(&input, None);

        let snapshot = snapshot.unwrap();
        assert_eq!(result, score(&input, None));
        assert_eq!(result.current_price, Some(snapshot.current_price));
        assert!(snapshot.atr.value > 0.0);

        let flat = ScoreInput::new(BarSeries::new(create_flat_bars(60, 50.0)).unwrap());
        let (result, snapshot) = analyze(&flat, None);
        assert_eq!(result.signal, Signal::Error);
        assert!(snapshot.is_none());
    }
}
