//! Fetch-and-Cache Gateway
//!
//! The only path to the upstream market data API. Serves fresh cached
//! payloads, otherwise performs a bounded GET, classifies failures and stores
//! successful payloads under their logical cache key.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{FetchError, RATE_LIMIT_MESSAGE};
use crate::gateway::Throttle;

// == Gateway Config ==
/// Settings the gateway needs from the process configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the market data API, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum spacing between upstream requests
    pub min_interval: Duration,
    pub cache_max_entries: usize,
    pub cache_ttl_secs: u64,
}

impl From<&Config> for GatewayConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.upstream_base_url.clone(),
            timeout: config.upstream_timeout(),
            min_interval: config.upstream_min_interval(),
            cache_max_entries: config.cache_max_entries,
            cache_ttl_secs: config.cache_ttl_secs,
        }
    }
}

// == Fetch Gateway ==
#[derive(Debug)]
pub struct FetchGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    /// Response cache; nothing outside the gateway writes to it
    cache: RwLock<CacheStore>,
    throttle: Throttle,
}

impl FetchGateway {
    // == Constructor ==
    /// Builds the HTTP client and an empty cache.
    pub fn new(config: GatewayConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crypto_tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            cache: RwLock::new(CacheStore::new(
                config.cache_max_entries,
                config.cache_ttl_secs,
            )),
            throttle: Throttle::new(config.min_interval),
        })
    }

    // == Locator ==
    /// Joins the upstream base URL with a path (and query), e.g. `/global`.
    pub fn locator(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // == Fetch ==
    /// Returns the payload for `locator`, consulting the cache under `key` first.
    ///
    /// Without a key the call always goes upstream and nothing is stored.
    /// Failures are never cached.
    pub async fn fetch(&self, key: Option<&str>, locator: &str) -> Result<Value, FetchError> {
        if let Some(key) = key {
            let cached = self.cache.write().await.get_fresh(key);
            if let Some(payload) = cached {
                debug!("Serving from cache: {}", key);
                return Ok(payload);
            }
            debug!("Cache miss: {}", key);
        }

        self.throttle.wait().await;
        info!("Fetching from upstream: {}", locator);

        let payload = self.request(locator).await.map_err(|err| {
            warn!("Upstream request to {} failed: {}", locator, err);
            err
        })?;

        if let Some(key) = key {
            self.cache.write().await.insert(key, payload.clone());
        }

        Ok(payload)
    }

    /// Performs the GET and classifies every failure mode.
    async fn request(&self, locator: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.network_error(e))?;
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        if let Some(error) = payload.as_object().and_then(|object| object.get("error")) {
            return Err(FetchError::UpstreamError(upstream_message(error)));
        }

        Ok(payload)
    }

    fn network_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Network(format!("request timed out after {:?}", self.timeout))
        } else {
            FetchError::Network(err.to_string())
        }
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Purge Stale ==
    /// Drops cached payloads outside the expiration window.
    pub async fn purge_stale(&self) -> usize {
        self.cache.write().await.purge_stale()
    }
}

/// Renders an upstream `error` field as a human-readable message.
fn upstream_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
