//! Engine-level properties of the swing score.

use chrono::{Duration, NaiveDate};
use swingscore::services::analysis::math::{round1, round2};
use swingscore::services::scoring::score;
use swingscore::types::*;

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Duration::days(i as i64)
}

/// Rising series with a superimposed swing: close = 100 + 0.3i + 4 sin(i/3).
fn wavy_series(count: usize) -> BarSeries {
    let closes: Vec<f64> = (0..count)
        .map(|i| 100.0 + 0.3 * i as f64 + 4.0 * (i as f64 / 3.0).sin())
        .collect();

    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: day(i),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0 + 150.0 * ((i % 7) as f64),
            }
        })
        .collect();

    BarSeries::new(bars).unwrap()
}

fn trending_series(count: usize, start: f64, step: f64) -> BarSeries {
    let bars = (0..count)
        .map(|i| {
            let close = start + step * i as f64;
            Bar {
                date: day(i),
                open: close - step / 2.0,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 5000.0,
            }
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

/// A long advance, a shallow pullback from a 300 peak, then a high-volume
/// bullish engulfing bar off a fresh swing low.
fn pullback_breakout_series() -> BarSeries {
    let mut closes: Vec<f64> = (0..150).map(|i| 100.0 + 200.0 * i as f64 / 149.0).collect();
    closes.extend((1..=25).map(|j| 300.0 - j as f64));
    let base = 275.0;
    closes.extend((1..=50).map(|j| base + 3.0 * j as f64 / 50.0 + 0.3 * (j as f64 / 2.0).sin()));
    for _ in 0..8 {
        let last = closes[closes.len() - 1];
        closes.push(last - 0.2);
    }
    let trough = closes.len() - 1;
    let bounce = closes[trough] + 0.2;
    closes.push(bounce);
    closes.push(bounce - 0.2);

    let mut bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let extra = if i == trough { 0.1 } else { 0.0 };
            Bar {
                date: day(i),
                open,
                high: open.max(close) + 1.5,
                low: open.min(close) - 1.5 - extra,
                close,
                volume: 1000.0 + 100.0 * ((i % 5) as f64),
            }
        })
        .collect();

    let previous = bars[bars.len() - 1].clone();
    let open = previous.close - 0.2;
    let close = previous.open + 3.0;
    bars.push(Bar {
        date: day(bars.len()),
        open,
        high: close + 0.2,
        low: open - 0.2,
        close,
        volume: 4000.0,
    });

    BarSeries::new(bars).unwrap()
}

fn sample_inputs() -> Vec<ScoreInput> {
    vec![
        ScoreInput::new(wavy_series(120)),
        ScoreInput::new(wavy_series(260)).with_week52(190.0, 95.0),
        ScoreInput::new(trending_series(220, 50.0, 0.5)),
        ScoreInput::new(trending_series(220, 400.0, -1.2)).with_week52(420.0, 130.0),
        ScoreInput::new(wavy_series(26)),
        ScoreInput::new(pullback_breakout_series()).with_week52(330.0, 140.0),
    ]
}

#[test]
fn test_score_stays_in_range() {
    for input in sample_inputs() {
        let result = score(&input, None);
        assert!(
            (0.0..=10.0).contains(&result.score),
            "score {} out of range",
            result.score
        );
        assert_eq!(result.max_score, 10.0);
    }
}

#[test]
fn test_scoring_is_deterministic() {
    for input in sample_inputs() {
        let first = score(&input, None);
        let second = score(&input, None);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_score_is_rounded_sum_of_factors() {
    for input in sample_inputs() {
        let result = score(&input, None);
        if !result.signal.is_scored() {
            continue;
        }

        assert_eq!(result.breakdown.len(), Factor::ALL.len());
        for (factor, entry) in &result.breakdown {
            assert!(entry.score >= 0.0 && entry.score <= factor.max_points());
            assert_eq!(entry.max, factor.max_points());
        }

        let total: f64 = result.breakdown.values().map(|f| f.score).sum();
        assert_eq!(result.score, round1(total));
        assert_eq!(result.breakdown[&Factor::Sector].score, 0.0);
    }
}

#[test]
fn test_signal_follows_score() {
    for input in sample_inputs() {
        let result = score(&input, None);
        if !result.signal.is_scored() {
            continue;
        }
        assert_eq!(result.signal, Signal::from_score(result.score));
        assert_eq!(result.confidence, result.signal.confidence());
        assert_eq!(result.signal_text, result.signal.text());
    }

    assert_eq!(Signal::from_score(8.0), Signal::StrongBuy);
    assert_eq!(Signal::from_score(7.9), Signal::Buy);
    assert_eq!(Signal::from_score(7.0), Signal::Buy);
    assert_eq!(Signal::from_score(6.9), Signal::Watchlist);
    assert_eq!(Signal::from_score(5.0), Signal::Watchlist);
    assert_eq!(Signal::from_score(4.9), Signal::Avoid);
}

#[test]
fn test_trade_setup_recomputes() {
    let result = score(&ScoreInput::new(wavy_series(120)), None);
    assert!(result.signal.is_scored(), "{:?}", result.error);

    let setup = result.trade_setup.unwrap();
    let risk = setup.entry - setup.stop_loss;
    let reward = setup.target2 - setup.entry;

    assert!(setup.stop_loss < setup.entry);
    assert!(setup.target1 > setup.entry);
    assert_eq!(setup.risk_reward_ratio, round2(reward / risk));
    assert_eq!(setup.risk_percent, round2(risk / setup.entry * 100.0));
    assert_eq!(setup.entry, round2(result.current_price.unwrap()));
}

#[test]
fn test_short_history_is_insufficient() {
    let result = score(&ScoreInput::new(wavy_series(25)), None);

    assert_eq!(result.signal, Signal::InsufficientData);
    assert_eq!(result.score, 0.0);
    assert!(result.breakdown.is_empty());
    assert!(result.trade_setup.is_none());
    assert_eq!(
        result.error.as_deref(),
        Some("Insufficient data for analysis: need at least 26 bars, have 25")
    );
}

#[test]
fn test_minimum_history_scores() {
    let result = score(&ScoreInput::new(wavy_series(26)), None);
    assert!(result.signal.is_scored(), "{:?}", result.error);

    // No ADX on 26 bars, so the factor contributes nothing.
    assert_eq!(result.breakdown[&Factor::Adx].score, 0.0);
    assert!(result.indicators.unwrap().adx.is_none());
}

#[test]
fn test_steady_decline_scores_low() {
    let input = ScoreInput::new(trending_series(220, 400.0, -1.2));
    let result = score(&input, None);

    assert!(result.signal.is_scored(), "{:?}", result.error);
    assert_eq!(result.breakdown[&Factor::Trend].score, 0.0);
    assert_eq!(
        result.indicators.as_ref().unwrap().trend,
        TrendDirection::Down
    );
    assert!(result.score < 5.0);
    assert_eq!(result.signal, Signal::Avoid);
}

#[test]
fn test_market_health_does_not_change_score() {
    let input = ScoreInput::new(wavy_series(120));
    let health = MarketHealth {
        symbol: "^NSEI".to_string(),
        change_percent: -2.5,
        is_bullish: false,
    };

    assert_eq!(score(&input, None), score(&input, Some(&health)));
}

#[test]
fn test_pullback_engulfing_is_strong_buy() {
    let series = pullback_breakout_series();
    assert!(series.len() >= 200);

    let result = score(&ScoreInput::new(series).with_week52(330.0, 140.0), None);
    assert!(result.signal.is_scored(), "{:?}", result.error);
    assert!(result.score >= 8.0, "score {} {:?}", result.score, result.breakdown);
    assert_eq!(result.signal, Signal::StrongBuy);
    assert_eq!(result.confidence, Confidence::High);

    let breakdown = &result.breakdown;
    assert_eq!(breakdown[&Factor::Trend].score, 1.5);
    assert_eq!(breakdown[&Factor::Volume].score, 1.5);
    assert_eq!(breakdown[&Factor::Macd].score, 1.0);
    assert_eq!(breakdown[&Factor::Pattern].score, 1.0);
    assert!(breakdown[&Factor::Pattern].reasons[0].contains("Bullish Engulfing"));

    assert!(result
        .patterns
        .iter()
        .any(|p| p.kind == PatternKind::BullishEngulfing));
}
