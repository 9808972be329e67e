//! API Routes
//!
//! Configures the Axum router with every market data endpoint.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, coin_details_handler, global_market_handler, health_handler,
    index_handler, market_cap_chart_handler, price_chart_handler, top_coins_handler,
    trending_coins_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: any origin, since the front end is served from elsewhere
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/global_market_data", get(global_market_handler))
        .route("/trending_coins", get(trending_coins_handler))
        .route("/top_coins", get(top_coins_handler))
        .route("/coin_details/:coin_id", get(coin_details_handler))
        .route("/coin_price_chart/:coin_id/:days", get(price_chart_handler))
        .route(
            "/coin_market_cap_chart/:coin_id/:days",
            get(market_cap_chart_handler),
        )
        .route("/cache_stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
