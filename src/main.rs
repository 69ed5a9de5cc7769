//! Paybridge service entry point.

use std::sync::Arc;

use paybridge::adapters::http::{app_router, PaymentsAppState};
use paybridge::adapters::{InMemoryRateCache, LoggingTransactionSink, ProviderRegistry};
use paybridge::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    config.validate()?;
    let addr = config.server.socket_addr()?;

    let cache = Arc::new(InMemoryRateCache::new());
    let _sweeper = cache.spawn_sweeper(config.rates.sweep_interval());

    let registry = Arc::new(ProviderRegistry::from_config(&config, cache.clone())?);
    let state = PaymentsAppState::new(registry, cache, Arc::new(LoggingTransactionSink::new()));
    let app = app_router(
        state,
        config.server.request_timeout(),
        config.features.enable_tracing,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Paybridge listening");
    axum::serve(listener, app).await?;

    Ok(())
}
