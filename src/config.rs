//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};

/// Public CoinGecko v3 endpoint
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the market data API, without trailing slash
    pub upstream_base_url: String,
    /// Per-request upstream timeout in seconds
    pub upstream_timeout_secs: u64,
    /// Minimum spacing between upstream requests in milliseconds
    pub upstream_min_interval_ms: u64,
    /// Maximum number of cached upstream responses
    pub cache_max_entries: usize,
    /// Expiration window for cached responses in seconds
    pub cache_ttl_secs: u64,
    /// Background stale-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Rendered chart width in pixels
    pub chart_width: u32,
    /// Rendered chart height in pixels
    pub chart_height: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `UPSTREAM_BASE_URL` - Market data API base (default: CoinGecko v3)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `UPSTREAM_MIN_INTERVAL_MS` - Throttle between upstream calls (default: 1000)
    /// - `CACHE_MAX_ENTRIES` - Cached response cap (default: 1000)
    /// - `CACHE_TTL_SECS` - Expiration window (default: 300)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `CHART_WIDTH` / `CHART_HEIGHT` - Chart size in pixels (default: 1000x500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs),
            upstream_min_interval_ms: env_or(
                "UPSTREAM_MIN_INTERVAL_MS",
                defaults.upstream_min_interval_ms,
            ),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            chart_width: env_or("CHART_WIDTH", defaults.chart_width),
            chart_height: env_or("CHART_HEIGHT", defaults.chart_height),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn upstream_min_interval(&self) -> Duration {
        Duration::from_millis(self.upstream_min_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout_secs: 10,
            upstream_min_interval_ms: 1000,
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            cleanup_interval: 60,
            chart_width: 1000,
            chart_height: 500,
        }
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
