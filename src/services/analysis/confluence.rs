//! Four-category confirmation checklist.

use crate::types::{
    Confluence, ConfluenceCategory, EmaReading, MacdReading, RsiReading, SupportResistance,
    TrendAnalysis, VolumeReading,
};

/// Readings the checklist draws on.
pub struct ConfluenceInputs<'a> {
    pub emas: &'a EmaReading,
    pub rsi: &'a RsiReading,
    pub macd: &'a MacdReading,
    pub volume: &'a VolumeReading,
    pub trend: &'a TrendAnalysis,
    pub levels: &'a SupportResistance,
}

pub fn evaluate(inputs: &ConfluenceInputs<'_>) -> Confluence {
    Confluence::from_categories(
        trend_category(inputs.emas, inputs.trend),
        volume_category(inputs.volume),
        momentum_category(inputs.rsi, inputs.macd),
        pattern_category(inputs.levels),
    )
}

fn trend_category(emas: &EmaReading, trend: &TrendAnalysis) -> ConfluenceCategory {
    let mut category = ConfluenceCategory::new("Trend Confirmation", 2.0);

    if emas.above_ema20 {
        category.check("Price above 20 EMA", 1.0);
    } else {
        category.check("Price below 20 EMA", 0.0);
    }
    if emas.above_ema50 {
        category.check("Price above 50 EMA", 1.0);
    } else {
        category.check("Price below 50 EMA", 0.0);
    }
    // Recorded, not scored.
    if trend.is_uptrend {
        category.check("Clear uptrend (higher highs and higher lows)", 0.0);
    }

    category.finish()
}

fn volume_category(volume: &VolumeReading) -> ConfluenceCategory {
    let mut category = ConfluenceCategory::new("Volume Confirmation", 1.0);
    let ratio = volume.ratio;

    if ratio >= 1.5 {
        category.check(format!("High volume ({}x average)", ratio), 2.0);
    } else if ratio >= 1.2 {
        category.check(format!("Moderate volume ({}x average)", ratio), 1.0);
    } else {
        category.check(format!("Low volume ({}x average)", ratio), 0.0);
    }

    category.finish()
}

fn momentum_category(rsi: &RsiReading, macd: &MacdReading) -> ConfluenceCategory {
    let mut category = ConfluenceCategory::new("Momentum Confirmation", 1.5);

    if (40.0..=70.0).contains(&rsi.current) {
        category.check(format!("RSI in favorable zone ({:.1})", rsi.current), 1.0);
    } else if rsi.current < 40.0 {
        category.check(
            format!("RSI oversold ({:.1}), potential bounce", rsi.current),
            0.5,
        );
    } else {
        category.check(
            format!("RSI overbought ({:.1}), risky entry", rsi.current),
            0.0,
        );
    }

    if macd.histogram_or_zero() > 0.0 {
        category.check("MACD histogram positive", 1.0);
    } else if macd.histogram_increasing {
        category.check("MACD histogram improving", 0.5);
    } else {
        category.check("MACD histogram negative", 0.0);
    }

    category.finish()
}

fn pattern_category(levels: &SupportResistance) -> ConfluenceCategory {
    let mut category = ConfluenceCategory::new("Pattern Confirmation", 1.0);
    let distance = levels.distance_to_resistance;

    if distance < 1.0 {
        category.check("Near resistance, potential breakout", 1.0);
    } else if distance > 5.0 {
        category.check("Room to move (far from resistance)", 1.0);
    } else {
        category.check("Moderate distance from resistance", 0.5);
    }
    if levels.near_support {
        category.check("Bouncing from support level", 1.0);
    }

    category.finish()
}
