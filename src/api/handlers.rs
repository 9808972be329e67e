//! API Handlers
//!
//! Each data endpoint derives a cache key and upstream locator, goes through
//! the fetch gateway, and shapes or charts the payload.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::chart::{parse_hex_color, series_from_pairs, ChartRenderer, ChartSpec};
use crate::config::Config;
use crate::error::{ApiError, FetchError, Result};
use crate::gateway::{FetchGateway, GatewayConfig};
use crate::models::{
    CacheStatsResponse, ChartResponse, CoinDetailsResponse, CoinId, Days, GlobalMarketResponse,
    HealthResponse, TrendingCoin,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Sole owner of the response cache and upstream client
    pub gateway: Arc<FetchGateway>,
    pub renderer: ChartRenderer,
}

impl AppState {
    pub fn new(gateway: FetchGateway, renderer: ChartRenderer) -> Self {
        Self {
            gateway: Arc::new(gateway),
            renderer,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let gateway = FetchGateway::new(GatewayConfig::from(config))?;
        let renderer = ChartRenderer::new(config.chart_width, config.chart_height);
        Ok(Self::new(gateway, renderer))
    }
}

// == Chart Kinds ==
/// Which `market_chart` series a chart endpoint plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Price,
    MarketCap,
}

impl ChartKind {
    /// Field of the upstream `market_chart` payload holding the pairs
    fn series_field(self) -> &'static str {
        match self {
            ChartKind::Price => "prices",
            ChartKind::MarketCap => "market_caps",
        }
    }

    fn cache_key(self, coin: &CoinId, days: Days) -> String {
        let prefix = match self {
            ChartKind::Price => "price_chart",
            ChartKind::MarketCap => "market_cap_chart",
        };
        format!("{}_{}_{}", prefix, coin, days)
    }

    fn title(self, coin: &CoinId, days: Days) -> String {
        let subject = match self {
            ChartKind::Price => "Price Chart",
            ChartKind::MarketCap => "Market Cap Chart",
        };
        format!("{} {} ({})", coin.display_name(), subject, days.title_label())
    }

    fn y_axis_label(self) -> &'static str {
        match self {
            ChartKind::Price => "Price (USD)",
            ChartKind::MarketCap => "Market Cap (USD)",
        }
    }

    fn stroke_hex(self) -> &'static str {
        match self {
            ChartKind::Price => "#00d8ff",
            ChartKind::MarketCap => "#ff6b6b",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ChartKind::Price => "price",
            ChartKind::MarketCap => "market cap",
        }
    }
}

fn parse_coin(raw: &str) -> Result<CoinId> {
    raw.parse().map_err(ApiError::InvalidParameter)
}

fn parse_days(raw: &str) -> Result<Days> {
    raw.parse().map_err(ApiError::InvalidParameter)
}

/// Handler for GET /
pub async fn index_handler() -> &'static str {
    "Welcome to the Crypto Tracker backend. See /global_market_data, /trending_coins, \
     /top_coins, /coin_details/:coin_id and the chart endpoints."
}

/// Handler for GET /global_market_data
pub async fn global_market_handler(
    State(state): State<AppState>,
) -> Result<Json<GlobalMarketResponse>> {
    let url = state.gateway.locator("/global");
    let payload = state.gateway.fetch(Some("global_data"), &url).await?;

    Ok(Json(GlobalMarketResponse::from_upstream(&payload)?))
}

/// Handler for GET /trending_coins
pub async fn trending_coins_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrendingCoin>>> {
    let url = state.gateway.locator("/search/trending");
    let payload = state.gateway.fetch(Some("trending_coins"), &url).await?;

    Ok(Json(TrendingCoin::list_from_upstream(&payload)?))
}

/// Handler for GET /top_coins
///
/// Passes the upstream markets listing through unchanged.
pub async fn top_coins_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let url = state.gateway.locator(
        "/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=100&page=1&sparkline=false",
    );
    let payload = state.gateway.fetch(Some("top_coins"), &url).await?;

    Ok(Json(payload))
}

/// Handler for GET /coin_details/:coin_id
pub async fn coin_details_handler(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<CoinDetailsResponse>> {
    let coin = parse_coin(&coin_id)?;

    let url = state.gateway.locator(&format!("/coins/{}", coin));
    let key = format!("coin_details_{}", coin);
    let payload = state.gateway.fetch(Some(&key), &url).await?;

    Ok(Json(CoinDetailsResponse::from_upstream(&payload)))
}

/// Handler for GET /coin_price_chart/:coin_id/:days
pub async fn price_chart_handler(
    State(state): State<AppState>,
    Path((coin_id, days)): Path<(String, String)>,
) -> Result<Json<ChartResponse>> {
    chart_for(&state, ChartKind::Price, &coin_id, &days).await
}

/// Handler for GET /coin_market_cap_chart/:coin_id/:days
pub async fn market_cap_chart_handler(
    State(state): State<AppState>,
    Path((coin_id, days)): Path<(String, String)>,
) -> Result<Json<ChartResponse>> {
    chart_for(&state, ChartKind::MarketCap, &coin_id, &days).await
}

/// Validates parameters, fetches the market chart, and renders one series.
async fn chart_for(
    state: &AppState,
    kind: ChartKind,
    raw_coin: &str,
    raw_days: &str,
) -> Result<Json<ChartResponse>> {
    let coin = parse_coin(raw_coin)?;
    let days = parse_days(raw_days)?;

    let url = state.gateway.locator(&format!(
        "/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
        coin, days
    ));
    let payload = state
        .gateway
        .fetch(Some(&kind.cache_key(&coin, days)), &url)
        .await?;

    let series = series_from_pairs(payload.get(kind.series_field()));
    if series.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No {} data available for {} ({}).",
            kind.noun(),
            coin,
            days.title_label()
        )));
    }
    debug!("Charting {} {} points for {}", series.len(), kind.noun(), coin);

    let stroke = parse_hex_color(kind.stroke_hex())
        .ok_or_else(|| ApiError::Internal(format!("bad stroke colour {}", kind.stroke_hex())))?;
    let spec = ChartSpec::new(series, kind.title(&coin, days), kind.y_axis_label(), stroke);
    let chart = state.renderer.render_blocking(spec).await?;

    Ok(Json(ChartResponse { chart }))
}

/// Handler for GET /cache_stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::from(state.gateway.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
