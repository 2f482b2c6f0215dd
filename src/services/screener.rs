//! Score many instruments and rank them.

use std::cmp::Ordering;
use tracing::{info, warn};

use crate::services::scoring;
use crate::types::{MarketHealth, RankedScore, ScreenCandidate, ScreenReport};

/// Score every candidate, keep those at or above `min_score`, best first.
///
/// Ties are broken by symbol. Results that could not be scored are dropped.
pub fn screen(
    candidates: &[ScreenCandidate],
    min_score: f64,
    limit: usize,
    market_health: Option<&MarketHealth>,
) -> ScreenReport {
    let mut stocks: Vec<RankedScore> = candidates
        .iter()
        .filter_map(|candidate| {
            let result = scoring::score(&candidate.score_input(), market_health);
            if !result.signal.is_scored() {
                warn!(
                    symbol = candidate.symbol.as_str(),
                    signal = ?result.signal,
                    error = result.error.as_deref().unwrap_or(""),
                    "candidate not scored"
                );
                return None;
            }
            Some(RankedScore {
                symbol: candidate.symbol.clone(),
                name: candidate
                    .name
                    .clone()
                    .unwrap_or_else(|| candidate.symbol.clone()),
                result,
            })
        })
        .filter(|ranked| ranked.result.score >= min_score)
        .collect();

    stocks.sort_by(|a, b| match b.result.score.total_cmp(&a.result.score) {
        Ordering::Equal => a.symbol.cmp(&b.symbol),
        other => other,
    });

    let qualified = stocks.len();
    stocks.truncate(limit);

    info!(
        screened = candidates.len(),
        qualified,
        returned = stocks.len(),
        min_score,
        "screen complete"
    );

    ScreenReport {
        screened: candidates.len(),
        qualified,
        min_score,
        stocks,
    }
}
