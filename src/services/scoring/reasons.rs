//! Headline reasons for a scored result.

use crate::types::{Breakdown, Factor, ReasonTone, SignalReasons};

const MAX_ITEMS: usize = 4;
const MIXED_ITEMS: usize = 2;

/// Bucket confirmed factors and outright failures by score band.
///
/// Confirmed factors contribute their first reason; factors that scored
/// exactly zero contribute theirs as an issue. Sector is never consulted.
pub fn signal_reasons(breakdown: &Breakdown, score: f64) -> SignalReasons {
    let mut reasons = Vec::new();
    let mut issues = Vec::new();

    for (factor, factor_score) in breakdown {
        if *factor == Factor::Sector {
            continue;
        }
        let Some(first) = factor_score.reasons.first() else {
            continue;
        };
        if factor_score.passed {
            reasons.push(first.clone());
        } else if factor_score.score == 0.0 {
            issues.push(first.clone());
        }
    }

    if score >= 7.0 {
        SignalReasons {
            tone: ReasonTone::Bullish,
            title: if score >= 8.0 {
                "Strong Setup".to_string()
            } else {
                "Buy Reasons".to_string()
            },
            summary: format!("{} bullish factors confirmed", reasons.len()),
            items: reasons.into_iter().take(MAX_ITEMS).collect(),
        }
    } else if score >= 5.0 {
        let summary = format!(
            "{} positive, needs {} more confirmations",
            reasons.len(),
            issues.len()
        );
        let items = reasons
            .into_iter()
            .take(MIXED_ITEMS)
            .chain(issues.into_iter().take(MIXED_ITEMS))
            .collect();
        SignalReasons {
            tone: ReasonTone::Neutral,
            title: "Watch For".to_string(),
            items,
            summary,
        }
    } else {
        SignalReasons {
            tone: ReasonTone::Bearish,
            title: "Avoid Because".to_string(),
            summary: format!("{} negative factors detected", issues.len()),
            items: issues.into_iter().take(MAX_ITEMS).collect(),
        }
    }
}
