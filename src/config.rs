use clap::Parser;
use url::Url;

use crate::cache::Environment;

/// Multi-provider cricket and football match feed
#[derive(Parser, Debug, Clone)]
#[command(name = "matchfeed", version, about)]
pub struct Config {
    /// Deployment environment (selects cache TTLs)
    #[arg(long, env = "ENVIRONMENT", value_enum, default_value = "development")]
    pub environment: Environment,

    /// HTTP API listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// SQLite database path (durable match snapshots)
    #[arg(long, env = "DATABASE_PATH", default_value = "matchfeed.db")]
    pub database_path: String,

    /// SportMonks API token (primary provider for both sports)
    #[arg(long, env = "SPORTMONKS_API_TOKEN")]
    pub sportmonks_api_token: Option<String>,

    /// Override for the SportMonks cricket base URL
    #[arg(long, env = "SPORTMONKS_CRICKET_URL")]
    pub sportmonks_cricket_url: Option<String>,

    /// Override for the SportMonks football base URL
    #[arg(long, env = "SPORTMONKS_FOOTBALL_URL")]
    pub sportmonks_football_url: Option<String>,

    /// CricketData API key; enables the secondary cricket provider
    #[arg(long, env = "CRICKETDATA_API_KEY")]
    pub cricketdata_api_key: Option<String>,

    /// Override for the CricketData base URL
    #[arg(long, env = "CRICKETDATA_URL")]
    pub cricketdata_url: Option<String>,

    /// Per-call upstream timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "10")]
    pub provider_timeout_secs: u64,

    /// Snapshot ingestion interval in seconds (0 disables the job)
    #[arg(long, env = "INGEST_INTERVAL_SECS", default_value = "300")]
    pub ingest_interval_secs: u64,

    /// Expired cache entry sweep interval in seconds
    #[arg(long, env = "CACHE_SWEEP_INTERVAL_SECS", default_value = "60")]
    pub cache_sweep_interval_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self
            .sportmonks_api_token
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
        {
            anyhow::bail!("SPORTMONKS_API_TOKEN is required");
        }
        if !(1..=120).contains(&self.provider_timeout_secs) {
            anyhow::bail!("provider_timeout_secs must be between 1 and 120");
        }
        if self.cache_sweep_interval_secs == 0 {
            anyhow::bail!("cache_sweep_interval_secs must be positive");
        }
        for url in [
            &self.sportmonks_cricket_url,
            &self.sportmonks_football_url,
            &self.cricketdata_url,
        ]
        .into_iter()
        .flatten()
        {
            Url::parse(url).map_err(|e| anyhow::anyhow!("invalid provider URL '{}': {}", url, e))?;
        }
        Ok(())
    }

    /// CricketData key, if one is configured and non-blank.
    pub fn cricketdata_key(&self) -> Option<&str> {
        self.cricketdata_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
