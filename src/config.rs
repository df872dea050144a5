//! Engine configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Pricing engine configuration.
///
/// Reads from environment variables (after loading `.env` if present):
/// - `PRICING_CURRENCY` - currency code on responses (default: `"USD"`)
/// - `PRICING_CACHE_CAPACITY` - memoized quotes kept, `0` disables (default: `1000`)
/// - `PRICING_CACHE_TTL_SECS` - lifetime of a memoized quote (default: `300`)
/// - `RUST_LOG` - tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub currency: String,
    pub cache_capacity: u64,
    pub cache_ttl: Duration,
    pub log_filter: String,
}

impl Config {
    /// Load `.env` then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            currency: lookup("PRICING_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.currency),
            cache_capacity: parse_or(&lookup, "PRICING_CACHE_CAPACITY", defaults.cache_capacity)?,
            cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "PRICING_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_capacity > 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(300),
            log_filter: "info".to_string(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
