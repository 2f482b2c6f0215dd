//! Cached access to daily price history.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::services::cache::TtlCache;
use crate::services::market_health::assess_market;
use crate::sources::yahoo::normalize_symbol;
use crate::sources::{DailyHistory, SourceError, YahooFinanceClient};
use crate::types::MarketHealthReport;

/// Chart range fetched for the benchmark index.
const INDEX_RANGE: &str = "3mo";

/// A history and whether it came from the cache.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub history: Arc<DailyHistory>,
    pub cached: bool,
}

/// Fetches daily history through a TTL cache keyed by `symbol:range`.
pub struct MarketDataService {
    client: YahooFinanceClient,
    cache: TtlCache<Arc<DailyHistory>>,
    default_range: String,
    symbol_suffix: Option<String>,
    market_index: String,
}

impl MarketDataService {
    pub fn new(client: YahooFinanceClient, config: &Config) -> Self {
        Self {
            client,
            cache: TtlCache::new(Duration::from_secs(config.cache_ttl_secs)),
            default_range: config.history_range.clone(),
            symbol_suffix: config.symbol_suffix.clone(),
            market_index: config.market_index.clone(),
        }
    }

    pub fn market_index(&self) -> &str {
        &self.market_index
    }

    /// Entries in the history cache, expired ones included.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Exchange symbol for a user-supplied one.
    pub fn normalize(&self, symbol: &str) -> String {
        normalize_symbol(symbol, self.symbol_suffix.as_deref())
    }

    /// Daily history for `symbol` over `range` (the configured range when `None`).
    pub async fn history(
        &self,
        symbol: &str,
        range: Option<&str>,
    ) -> Result<Fetched, SourceError> {
        let symbol = self.normalize(symbol);
        let range = range.unwrap_or(&self.default_range);
        let key = format!("{}:{}", symbol, range);

        if let Some(history) = self.cache.get(&key) {
            debug!(key = key.as_str(), "history cache hit");
            return Ok(Fetched {
                history,
                cached: true,
            });
        }

        let history = Arc::new(self.client.get_daily_history(&symbol, range).await?);
        self.cache.insert(key, Arc::clone(&history));

        Ok(Fetched {
            history,
            cached: false,
        })
    }

    /// Fetch several symbols one at a time, keeping the ones that succeed.
    ///
    /// Returns the histories in request order and whether all of them were
    /// served from cache.
    pub async fn histories(
        &self,
        symbols: &[String],
        range: Option<&str>,
    ) -> (Vec<Arc<DailyHistory>>, bool) {
        let mut histories = Vec::with_capacity(symbols.len());
        let mut all_cached = true;

        for symbol in symbols {
            match self.history(symbol, range).await {
                Ok(fetched) => {
                    all_cached &= fetched.cached;
                    histories.push(fetched.history);
                }
                Err(e) => warn!(symbol = symbol.as_str(), error = %e, "skipping symbol"),
            }
        }

        let purged = self.cache.purge_expired();
        info!(
            requested = symbols.len(),
            fetched = histories.len(),
            purged,
            "batch history fetch complete"
        );

        let cached = all_cached && !histories.is_empty();
        (histories, cached)
    }

    /// Regime of the configured benchmark index, read through the same cache
    /// as stock histories.
    pub async fn market_health(&self) -> Result<(MarketHealthReport, bool), SourceError> {
        let index = self.normalize(&self.market_index);
        let fetched = self.history(&index, Some(INDEX_RANGE)).await?;
        let report = assess_market(&index, &fetched.history.bars).map_err(|e| {
            SourceError::Api {
                code: "InsufficientHistory".to_string(),
                description: e.to_string(),
            }
        })?;

        info!(
            index = index.as_str(),
            status = ?report.market_status,
            change_percent = report.change_percent,
            cached = fetched.cached,
            "market health"
        );
        Ok((report, fetched.cached))
    }

    /// Market health for scoring context. Failures are logged and ignored.
    pub async fn market_context(&self) -> Option<MarketHealthReport> {
        match self.market_health().await {
            Ok((report, _)) => Some(report),
            Err(e) => {
                warn!(index = self.market_index.as_str(), error = %e, "market health unavailable");
                None
            }
        }
    }
}
