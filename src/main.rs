use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod aggregator;
mod api;
mod cache;
mod config;
mod db;
mod error;
mod normalize;
mod providers;

use aggregator::{start_snapshot_ingest, Orchestrator};
use api::AppState;
use cache::MemoryCache;
use config::Config;
use db::models::Sport;
use db::Database;
use providers::{CricketData, ProviderRegistry, Role, SportMonks};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    info!("Starting matchfeed ({} environment)", config.environment);

    // Open database
    let db = Arc::new(Database::open(&config.database_path)?);
    info!(
        "Database opened: {} ({} stored matches)",
        config.database_path,
        db.count_matches()?
    );

    let provider_timeout = Duration::from_secs(config.provider_timeout_secs);
    let registry = build_registry(&config, provider_timeout)?;
    info!("Configured {} provider tier(s)", registry.len());

    let cache = Arc::new(MemoryCache::new());
    cache.start_sweeper(Duration::from_secs(config.cache_sweep_interval_secs));

    let orchestrator = Arc::new(Orchestrator::new(
        registry,
        cache,
        db.clone(),
        config.environment,
        provider_timeout,
    ));

    if config.ingest_interval_secs > 0 {
        start_snapshot_ingest(
            orchestrator.clone(),
            db.clone(),
            Duration::from_secs(config.ingest_interval_secs),
        );
    } else {
        warn!("Snapshot ingest disabled; fallback serves only previously stored matches");
    }

    let app = api::router(AppState { orchestrator });
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN_ADDR {}", config.listen_addr))?;
    info!("API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// SportMonks is primary for both sports; CricketData backs up cricket when keyed.
fn build_registry(config: &Config, timeout: Duration) -> Result<ProviderRegistry> {
    let token = config
        .sportmonks_api_token
        .as_deref()
        .context("SPORTMONKS_API_TOKEN is required")?;
    let sportmonks = Arc::new(SportMonks::new(
        token,
        config.sportmonks_cricket_url.as_deref(),
        config.sportmonks_football_url.as_deref(),
        timeout,
    )?);

    let mut registry = ProviderRegistry::new()
        .register(Sport::Cricket, Role::Primary, sportmonks.clone())
        .register(Sport::Football, Role::Primary, sportmonks);

    match config.cricketdata_key() {
        Some(key) => {
            let cricketdata = CricketData::new(key, config.cricketdata_url.as_deref(), timeout)?;
            registry = registry.register(Sport::Cricket, Role::Secondary, Arc::new(cricketdata));
        }
        None => warn!("CRICKETDATA_API_KEY not set; cricket has no secondary provider"),
    }

    Ok(registry)
}
