use std::env;

/// Screener limits.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Minimum score a result needs to be listed (default: 5.0).
    pub min_score: f64,
    /// Maximum number of ranked results returned (default: 50).
    pub limit: usize,
    /// Maximum number of symbols accepted by a single screen request (default: 250).
    pub max_symbols: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            min_score: 5.0,
            limit: 50,
            max_symbols: 250,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// How long fetched price histories stay cached (seconds).
    pub cache_ttl_secs: u64,
    /// Yahoo chart range requested for daily history (e.g. "1y").
    pub history_range: String,
    /// Exchange suffix appended to bare symbols (e.g. ".NS").
    pub symbol_suffix: Option<String>,
    /// Benchmark index used for market health (default: "^NSEI").
    pub market_index: String,
    /// Screener limits.
    pub screen: ScreenConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ScreenConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            history_range: env::var("HISTORY_RANGE").unwrap_or_else(|_| "1y".to_string()),
            symbol_suffix: env::var("SYMBOL_SUFFIX")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            market_index: env::var("MARKET_INDEX").unwrap_or_else(|_| "^NSEI".to_string()),
            screen: ScreenConfig {
                min_score: env::var("SCREEN_MIN_SCORE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_score),
                limit: env::var("SCREEN_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.limit),
                max_symbols: env::var("SCREEN_MAX_SYMBOLS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_symbols),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
