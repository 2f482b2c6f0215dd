//! Per-factor scoring rules.
//!
//! Each function scores one [`Factor`] from the readings it depends on and
//! returns the clamped [`FactorScore`] with its human-readable reasons.

use crate::services::analysis::math::{round1, round_to};
use crate::types::{
    AdxReading, CandlestickReading, EmaReading, Factor, FactorScore, MacdReading,
    PatternStrength, RsiReading, SupportResistance, TradeSetup, TrendAnalysis, VolumeReading,
};

pub fn score_trend(emas: &EmaReading, trend: &TrendAnalysis) -> FactorScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if emas.above_ema50 {
        score += 0.5;
        reasons.push("Price above 50 EMA".to_string());
    }
    if emas.ema50_above200 {
        score += 0.5;
        reasons.push("50 EMA above 200 EMA".to_string());
    }
    if trend.is_uptrend {
        score += 0.5;
        reasons.push("Confirmed uptrend".to_string());
    }

    FactorScore::new(Factor::Trend, score, reasons)
}

pub fn score_rsi(rsi: &RsiReading) -> FactorScore {
    let current = round1(rsi.current);
    let reason = if rsi.in_swing_zone {
        Some((1.0, format!("RSI at {:.1} - momentum room available", current)))
    } else if rsi.is_recovering {
        Some((1.0, "RSI recovering from oversold zone".to_string()))
    } else if (35.0..=65.0).contains(&rsi.current) {
        Some((0.5, format!("RSI at {:.1} - acceptable range", current)))
    } else if rsi.is_overbought {
        Some((0.0, "RSI overbought - risky entry".to_string()))
    } else if rsi.is_oversold {
        Some((0.5, "RSI oversold - potential reversal".to_string()))
    } else {
        None
    };

    match reason {
        Some((score, reason)) => FactorScore::new(Factor::Rsi, score, vec![reason]),
        None => FactorScore::new(Factor::Rsi, 0.0, Vec::new()),
    }
}

pub fn score_macd(macd: &MacdReading) -> FactorScore {
    let reason = if macd.bullish_crossover {
        Some((1.0, "Fresh MACD bullish crossover"))
    } else if macd.recent_bullish_crossover {
        Some((0.8, "Recent MACD bullish crossover (within 3 days)"))
    } else if macd.is_bullish && macd.histogram_increasing {
        Some((0.7, "MACD bullish with increasing momentum"))
    } else if macd.is_bullish {
        Some((0.5, "MACD above signal line"))
    } else {
        None
    };

    match reason {
        Some((score, reason)) => FactorScore::new(Factor::Macd, score, vec![reason.to_string()]),
        None => FactorScore::new(Factor::Macd, 0.0, Vec::new()),
    }
}

pub fn score_volume(volume: &VolumeReading) -> FactorScore {
    let (score, reason) = if volume.is_very_high_volume {
        (1.5, format!("Volume {}x average - very high interest", volume.ratio))
    } else if volume.is_high_volume {
        (1.2, format!("Volume {}x average - strong interest", volume.ratio))
    } else if volume.is_above_average {
        (0.8, format!("Volume {}x average - above normal", volume.ratio))
    } else {
        (0.3, "Below average volume".to_string())
    };

    FactorScore::new(Factor::Volume, score, vec![reason])
}

pub fn score_pattern(candles: &CandlestickReading) -> FactorScore {
    let names = |strong_only: bool| {
        candles
            .patterns
            .iter()
            .filter(|p| p.is_bullish() && (!strong_only || p.strength == PatternStrength::Strong))
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let (score, reasons) = if candles.has_strong_bullish_pattern {
        (1.0, vec![format!("Strong pattern: {}", names(true))])
    } else if candles.has_bullish_pattern {
        (0.6, vec![format!("Bullish pattern: {}", names(false))])
    } else if candles.current_candle.is_bullish {
        (0.3, vec!["Current candle is bullish".to_string()])
    } else {
        (0.0, Vec::new())
    };

    FactorScore::new(Factor::Pattern, score, reasons)
}

pub fn score_support(emas: &EmaReading, levels: &SupportResistance) -> FactorScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if emas.above_ema20 && emas.distance_from_ema20.abs() <= 1.0 {
        score += 0.5;
        reasons.push("Price near 20 EMA support".to_string());
    }
    let near_ema50 = emas
        .distance_from_ema50
        .map_or(false, |distance| distance.abs() <= 2.0);
    if emas.above_ema50 && near_ema50 {
        score += 0.3;
        reasons.push("Price near 50 EMA support".to_string());
    }
    if levels.near_support {
        score += 0.2;
        reasons.push("Near swing low support".to_string());
    }

    FactorScore::new(Factor::Support, score, reasons)
}

/// A missing ADX (short history) scores as a ranging market.
pub fn score_adx(adx: Option<&AdxReading>) -> FactorScore {
    let (score, reason) = match adx {
        Some(a) if a.is_strong_trend && a.is_bullish_trend => (
            1.0,
            format!("Strong bullish trend (ADX: {:.1})", round1(a.adx)),
        ),
        Some(a) if a.is_trending && a.is_bullish_trend => (
            0.7,
            format!("Moderate bullish trend (ADX: {:.1})", round1(a.adx)),
        ),
        Some(a) if a.is_trending => (0.4, format!("Trending market (ADX: {:.1})", round1(a.adx))),
        _ => (0.0, "Ranging market - weak trend".to_string()),
    };

    FactorScore::new(Factor::Adx, score, vec![reason])
}

/// Reserved until market-breadth data is wired in.
pub fn score_sector() -> FactorScore {
    FactorScore::new(
        Factor::Sector,
        0.0,
        vec!["Sector analysis not available".to_string()],
    )
}

/// Position of `price` within the 52-week `(high, low)` range.
pub fn score_week52(price: f64, week52: Option<(f64, f64)>) -> FactorScore {
    let Some((high, low)) = week52 else {
        return FactorScore::new(
            Factor::Week52,
            0.0,
            vec!["52-week data not available".to_string()],
        );
    };

    let position = (price - low) / (high - low) * 100.0;
    let (score, reason) = if (20.0..=80.0).contains(&position) {
        (
            0.5,
            format!("Price at {}% of 52-week range", round_to(position, 0)),
        )
    } else if position < 20.0 {
        (0.3, "Near 52-week low - recovery potential".to_string())
    } else {
        (0.0, "Near 52-week high - risky entry".to_string())
    };

    FactorScore::new(Factor::Week52, score, vec![reason])
}

/// Grades the ratio of the trade setup that is returned with the score.
pub fn score_risk_reward(setup: &TradeSetup) -> FactorScore {
    let ratio = setup.risk_reward_ratio;
    let shown = round1(ratio);
    let (score, reason) = if ratio >= 3.0 {
        (1.0, format!("Excellent R:R ratio of 1:{:.1}", shown))
    } else if ratio >= 2.0 {
        (0.7, format!("Good R:R ratio of 1:{:.1}", shown))
    } else if ratio >= 1.5 {
        (0.4, format!("Acceptable R:R ratio of 1:{:.1}", shown))
    } else {
        (0.0, format!("Poor R:R ratio of 1:{:.1}", shown))
    };

    FactorScore::new(Factor::RiskReward, score, vec![reason])
}
