use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Directional bias of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Bullish,
    Neutral,
    Bearish,
}

impl PatternCategory {
    /// Display rank: bullish first, bearish last.
    fn rank(&self) -> u8 {
        match self {
            PatternCategory::Bullish => 0,
            PatternCategory::Neutral => 1,
            PatternCategory::Bearish => 2,
        }
    }
}

/// How much weight a pattern carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStrength {
    Weak,
    Moderate,
    Strong,
}

impl PatternStrength {
    fn rank(&self) -> u8 {
        match self {
            PatternStrength::Strong => 0,
            PatternStrength::Moderate => 1,
            PatternStrength::Weak => 2,
        }
    }
}

/// Every pattern the detectors can report, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    // Candlesticks
    BullishEngulfing,
    Hammer,
    InvertedHammer,
    Doji,
    MorningStar,
    BullishMarubozu,
    // Swing structures
    FlagPennant,
    AscendingTriangle,
    SymmetricalTriangle,
    DoubleBottom,
    DoubleTop,
    ConsolidationBreakout,
    TightRange,
}

impl PatternKind {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::BullishEngulfing => "Bullish Engulfing",
            PatternKind::Hammer => "Hammer",
            PatternKind::InvertedHammer => "Inverted Hammer",
            PatternKind::Doji => "Doji",
            PatternKind::MorningStar => "Morning Star",
            PatternKind::BullishMarubozu => "Bullish Marubozu",
            PatternKind::FlagPennant => "Flag/Pennant",
            PatternKind::AscendingTriangle => "Ascending Triangle",
            PatternKind::SymmetricalTriangle => "Symmetrical Triangle",
            PatternKind::DoubleBottom => "Double Bottom",
            PatternKind::DoubleTop => "Double Top",
            PatternKind::ConsolidationBreakout => "Consolidation Breakout",
            PatternKind::TightRange => "Tight Range",
        }
    }

    pub fn category(&self) -> PatternCategory {
        match self {
            PatternKind::Doji | PatternKind::SymmetricalTriangle | PatternKind::TightRange => {
                PatternCategory::Neutral
            }
            PatternKind::DoubleTop => PatternCategory::Bearish,
            _ => PatternCategory::Bullish,
        }
    }

    pub fn strength(&self) -> PatternStrength {
        match self {
            PatternKind::Doji => PatternStrength::Weak,
            PatternKind::Hammer
            | PatternKind::InvertedHammer
            | PatternKind::SymmetricalTriangle
            | PatternKind::TightRange => PatternStrength::Moderate,
            _ => PatternStrength::Strong,
        }
    }

    pub fn is_candlestick(&self) -> bool {
        matches!(
            self,
            PatternKind::BullishEngulfing
                | PatternKind::Hammer
                | PatternKind::InvertedHammer
                | PatternKind::Doji
                | PatternKind::MorningStar
                | PatternKind::BullishMarubozu
        )
    }
}

/// A detected pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub name: String,
    pub category: PatternCategory,
    pub strength: PatternStrength,
    pub is_breakout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    pub description: String,
}

impl PatternMatch {
    pub fn new(kind: PatternKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            category: kind.category(),
            strength: kind.strength(),
            is_breakout: false,
            target: None,
            description: description.into(),
        }
    }

    pub fn with_breakout(mut self, is_breakout: bool) -> Self {
        self.is_breakout = is_breakout;
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_bullish(&self) -> bool {
        self.category == PatternCategory::Bullish
    }

    /// Display ordering: strength, then category, then detector order.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.strength
            .rank()
            .cmp(&other.strength.rank())
            .then(self.category.rank().cmp(&other.category.rank()))
            .then(self.kind.cmp(&other.kind))
    }
}

/// Sort matches into display order; the first element is the headline pattern.
pub fn sort_for_display(patterns: &mut [PatternMatch]) {
    patterns.sort_by(|a, b| a.display_cmp(b));
}

/// Shape of the most recent candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCandle {
    pub is_bullish: bool,
    /// Body as a percent of the bar range (two decimals, 0 for a zero-range bar).
    pub body_percent: f64,
}

/// Candlestick scan over the last three bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlestickReading {
    pub patterns: Vec<PatternMatch>,
    pub has_bullish_pattern: bool,
    pub has_strong_bullish_pattern: bool,
    pub current_candle: CurrentCandle,
}

impl CandlestickReading {
    pub fn new(patterns: Vec<PatternMatch>, current_candle: CurrentCandle) -> Self {
        let has_bullish_pattern = patterns.iter().any(|p| p.is_bullish());
        let has_strong_bullish_pattern = patterns
            .iter()
            .any(|p| p.is_bullish() && p.strength == PatternStrength::Strong);

        Self {
            patterns,
            has_bullish_pattern,
            has_strong_bullish_pattern,
            current_candle,
        }
    }
}
