//! API Module
//!
//! HTTP handlers and routing for the market data proxy.
//!
//! # Endpoints
//! - `GET /global_market_data` - Total market cap and 24h volume (USD)
//! - `GET /trending_coins` - Trending coins, simplified
//! - `GET /top_coins` - Top coins by market cap, passed through
//! - `GET /coin_details/:coin_id` - Selected fields for one coin
//! - `GET /coin_price_chart/:coin_id/:days` - Price chart as base64 PNG
//! - `GET /coin_market_cap_chart/:coin_id/:days` - Market cap chart as base64 PNG
//! - `GET /cache_stats` - Response cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
