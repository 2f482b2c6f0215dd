use swingscore::config::Config;
use swingscore::services::MarketDataService;
use swingscore::sources::YahooFinanceClient;
use swingscore::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swingscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting swingscore on {}:{} (range {}, cache ttl {}s)",
        config.host, config.port, config.history_range, config.cache_ttl_secs
    );
    if let Some(ref suffix) = config.symbol_suffix {
        info!("Appending exchange suffix {} to bare symbols", suffix);
    }
    info!("Market health benchmark: {}", config.market_index);

    let client = YahooFinanceClient::new()?;
    let market_data = MarketDataService::new(client, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, market_data);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("swingscore listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
