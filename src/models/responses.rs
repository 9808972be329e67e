//! Response DTOs for the market data API
//!
//! Simplified shapes served to the front end, built from upstream payloads.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::cache::CacheStats;
use crate::error::FetchError;

fn missing(field: &str) -> FetchError {
    FetchError::MalformedResponse(format!("missing field '{}'", field))
}

/// Response body for `GET /global_market_data`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GlobalMarketResponse {
    pub total_market_cap_usd: Number,
    pub total_volume_24h_usd: Number,
}

impl GlobalMarketResponse {
    /// Extracts the USD totals from the upstream `/global` payload.
    pub fn from_upstream(payload: &Value) -> Result<Self, FetchError> {
        let usd = |pointer: &str| {
            payload
                .pointer(pointer)
                .and_then(|value| match value {
                    Value::Number(n) => Some(n.clone()),
                    _ => None,
                })
                .ok_or_else(|| missing(pointer))
        };

        Ok(Self {
            total_market_cap_usd: usd("/data/total_market_cap/usd")?,
            total_volume_24h_usd: usd("/data/total_volume/usd")?,
        })
    }
}

/// One entry of `GET /trending_coins`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u64>,
    pub large_image: Option<String>,
}

impl TrendingCoin {
    /// Flattens the upstream `/search/trending` payload.
    pub fn list_from_upstream(payload: &Value) -> Result<Vec<Self>, FetchError> {
        let coins = payload
            .get("coins")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("coins"))?;

        coins
            .iter()
            .map(|entry| -> Result<Self, FetchError> {
                let item = entry.get("item").ok_or_else(|| missing("coins[].item"))?;
                let text = |field: &str| {
                    item.get(field)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| missing(field))
                };

                Ok(Self {
                    id: text("id")?,
                    name: text("name")?,
                    symbol: text("symbol")?,
                    market_cap_rank: item.get("market_cap_rank").and_then(Value::as_u64),
                    large_image: item
                        .get("large")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoinImages {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoinMarketData {
    /// Price per quote currency, `{}` when absent
    pub current_price: Value,
    /// Market cap per quote currency, `{}` when absent
    pub market_cap: Value,
    pub market_cap_rank: Option<u64>,
    pub sparkline_7d: Option<Value>,
}

/// Response body for `GET /coin_details/:coin_id`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoinDetailsResponse {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub description: String,
    pub image: CoinImages,
    pub market_data: CoinMarketData,
    pub homepage: Option<String>,
}

impl CoinDetailsResponse {
    pub const NO_DESCRIPTION: &'static str = "No description available.";

    /// Picks the fields the front end uses out of the upstream `/coins/{id}` payload.
    pub fn from_upstream(payload: &Value) -> Self {
        let text = |pointer: &str| {
            payload
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let object_or_empty = |pointer: &str| {
            payload
                .pointer(pointer)
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()))
        };

        Self {
            id: text("/id"),
            symbol: text("/symbol"),
            name: text("/name"),
            description: text("/description/en")
                .unwrap_or_else(|| Self::NO_DESCRIPTION.to_string()),
            image: CoinImages {
                thumb: text("/image/thumb"),
                small: text("/image/small"),
                large: text("/image/large"),
            },
            market_data: CoinMarketData {
                current_price: object_or_empty("/market_data/current_price"),
                market_cap: object_or_empty("/market_data/market_cap"),
                market_cap_rank: payload
                    .pointer("/market_data/market_cap_rank")
                    .and_then(Value::as_u64),
                sparkline_7d: payload
                    .pointer("/market_data/sparkline_7d")
                    .filter(|v| !v.is_null())
                    .cloned(),
            },
            homepage: text("/links/homepage/0"),
        }
    }
}

/// Response body for the chart endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    /// Base64-encoded PNG
    pub chart: String,
}

/// Response body for `GET /cache_stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub purged: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            purged: stats.purged,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
