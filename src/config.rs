//! Runtime Configuration
//!
//! Read once at startup from the environment. A `--bind <addr>` argument
//! overrides `BIND_ADDR`.

use anyhow::Context;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5006";
pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";
pub const DEFAULT_INDEX_PREFIX: &str = "search";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub elasticsearch_url: String,
    pub index_prefix: String,
    pub cache_ttl: Duration,
    pub cache_timeout: Duration,
    pub engine_timeout: Duration,
    pub cache_sweep_interval: Duration,
    pub environment: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: parse_var("BIND_ADDR", &var("BIND_ADDR", DEFAULT_BIND_ADDR))?,
            elasticsearch_url: var("ELASTICSEARCH_URL", DEFAULT_ELASTICSEARCH_URL),
            index_prefix: var("INDEX_PREFIX", DEFAULT_INDEX_PREFIX),
            cache_ttl: Duration::from_secs(parse_positive(
                "CACHE_TTL_SECS",
                &var("CACHE_TTL_SECS", "300"),
            )?),
            cache_timeout: Duration::from_millis(parse_positive(
                "CACHE_TIMEOUT_MS",
                &var("CACHE_TIMEOUT_MS", "250"),
            )?),
            engine_timeout: Duration::from_millis(parse_positive(
                "ENGINE_TIMEOUT_MS",
                &var("ENGINE_TIMEOUT_MS", "5000"),
            )?),
            cache_sweep_interval: Duration::from_secs(parse_positive(
                "CACHE_SWEEP_SECS",
                &var("CACHE_SWEEP_SECS", "60"),
            )?),
            environment: var("ENVIRONMENT", "development"),
            log_level: var("LOG_LEVEL", "info"),
        })
    }

    /// Applies command line overrides. Unknown arguments are ignored.
    pub fn apply_args(&mut self, args: &[String]) -> anyhow::Result<()> {
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = args.get(i + 1).context("--bind requires <addr:port>")?;
                    self.bind_addr = parse_var("--bind", value)?;
                    i += 2;
                }
                _ => {
                    i += 1;
                }
            }
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_var<T>(name: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value for {}: {:?}", name, value))
}

/// Parses a duration count that must be at least one.
fn parse_positive(name: &str, value: &str) -> anyhow::Result<u64> {
    let parsed: u64 = parse_var(name, value)?;
    if parsed == 0 {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(parsed)
}
