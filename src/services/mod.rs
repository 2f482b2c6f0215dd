pub mod analysis;
pub mod cache;
pub mod market_data;
pub mod market_health;
pub mod scoring;
pub mod screener;

pub use cache::TtlCache;
pub use market_data::{Fetched, MarketDataService};
pub use market_health::assess_market;
pub use scoring::{analyze, score, score_snapshot};
pub use screener::screen;
