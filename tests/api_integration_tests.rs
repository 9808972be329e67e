//! Integration Tests for API Endpoints
//!
//! Drives the full router against a mocked market data API.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_tracker::{
    api::create_router,
    chart::ChartRenderer,
    error::RATE_LIMIT_MESSAGE,
    gateway::{FetchGateway, GatewayConfig},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn create_test_app(server: &MockServer) -> Router {
    let gateway = FetchGateway::new(GatewayConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        min_interval: Duration::ZERO,
        cache_max_entries: 100,
        cache_ttl_secs: 300,
    })
    .unwrap();
    create_router(AppState::new(gateway, ChartRenderer::new(800, 400)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn market_chart_body() -> Value {
    json!({
        "prices": [[1700000000000u64, 42000], [1700086400000u64, 43000]],
        "market_caps": [[1700000000000u64, 820000000000u64], [1700086400000u64, 840000000000u64]],
        "total_volumes": [[1700000000000u64, 1], [1700086400000u64, 2]]
    })
}

fn assert_png_chart(body: &Value) {
    assert!(body.get("error").is_none(), "unexpected error: {}", body);
    let chart = body["chart"].as_str().expect("chart string");
    assert!(!chart.is_empty());

    let bytes = BASE64.decode(chart).expect("chart is valid base64");
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[..4], b"\x89PNG");
}

// == Shaped Endpoints ==

#[tokio::test]
async fn test_global_market_data_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"total_market_cap": {"usd": 1000000}, "total_volume": {"usd": 50000}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/global_market_data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"total_market_cap_usd": 1000000, "total_volume_24h_usd": 50000})
    );
}

#[tokio::test]
async fn test_repeated_request_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"total_market_cap": {"usd": 1}, "total_volume": {"usd": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (first_status, first) = get(&app, "/global_market_data").await;
    let (second_status, second) = get(&app, "/global_market_data").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);

    let (_, stats) = get(&app, "/cache_stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["total_entries"], 1);
}

#[tokio::test]
async fn test_trending_coins_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coins": [{"item": {
                "id": "pepe", "name": "Pepe", "symbol": "PEPE",
                "market_cap_rank": 40, "large": "https://img/pepe.png", "score": 0
            }}]
        })))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/trending_coins").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": "pepe", "name": "Pepe", "symbol": "PEPE",
            "market_cap_rank": 40, "large_image": "https://img/pepe.png"
        }])
    );
}

#[tokio::test]
async fn test_top_coins_pass_through() {
    let upstream = json!([{"id": "bitcoin", "current_price": 42000, "market_cap_rank": 1}]);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/top_coins").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
}

#[tokio::test]
async fn test_coin_details_subset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "description": {"en": "The first cryptocurrency."},
            "image": {"thumb": "t", "small": "s", "large": "l"},
            "market_data": {"current_price": {"usd": 42000}, "market_cap": {"usd": 8}, "market_cap_rank": 1},
            "links": {"homepage": ["http://www.bitcoin.org"]},
            "tickers": [{"base": "BTC"}]
        })))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/coin_details/bitcoin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bitcoin");
    assert_eq!(body["description"], "The first cryptocurrency.");
    assert_eq!(body["image"]["large"], "l");
    assert_eq!(body["market_data"]["current_price"]["usd"], 42000);
    assert_eq!(body["homepage"], "http://www.bitcoin.org");
    assert!(body.get("tickers").is_none());
}

#[tokio::test]
async fn test_unknown_coin_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/no-such-coin"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "coin not found"})))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/coin_details/no-such-coin").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// == Chart Endpoints ==

#[tokio::test]
async fn test_price_chart_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/bitcoin/market_chart"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("days", "7"))
        .and(query_param("interval", "daily"))
        .respond_with(ResponseTemplate::new(200).set_body_json(market_chart_body()))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/coin_price_chart/bitcoin/7").await;

    assert_eq!(status, StatusCode::OK);
    assert_png_chart(&body);
}

#[tokio::test]
async fn test_market_cap_chart_success_max_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/ethereum/market_chart"))
        .and(query_param("days", "max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(market_chart_body()))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/coin_market_cap_chart/ethereum/max").await;

    assert_eq!(status, StatusCode::OK);
    assert_png_chart(&body);
}

#[tokio::test]
async fn test_invalid_days_makes_no_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(market_chart_body()))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/coin_price_chart/bitcoin/13").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("13"));
}

#[tokio::test]
async fn test_malformed_coin_id_makes_no_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "coin not found"})))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    for uri in [
        "/coin_details/Bitcoin",
        "/coin_details/usd_coin",
        "/coin_price_chart/BTC/7",
        "/coin_market_cap_chart/a.b/30",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_empty_series_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/deadcoin/market_chart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prices": [],
            "total_volumes": []
        })))
        .mount(&server)
        .await;

    let app = create_test_app(&server);

    let (price_status, price_body) = get(&app, "/coin_price_chart/deadcoin/30").await;
    assert_eq!(price_status, StatusCode::NOT_FOUND);
    assert!(price_body["error"].as_str().unwrap().contains("price"));

    // market_caps is missing entirely
    let (cap_status, cap_body) = get(&app, "/coin_market_cap_chart/deadcoin/30").await;
    assert_eq!(cap_status, StatusCode::NOT_FOUND);
    assert!(cap_body.get("chart").is_none());
}

// == Upstream Failures ==

#[tokio::test]
async fn test_rate_limited_is_reported_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"total_market_cap": {"usd": 5}, "total_volume": {"usd": 6}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);

    let (status, body) = get(&app, "/global_market_data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], RATE_LIMIT_MESSAGE);

    // The failure was not cached, so the retry reaches upstream
    let (status, body) = get(&app, "/global_market_data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_market_cap_usd"], 5);
}

#[tokio::test]
async fn test_upstream_error_field_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "maintenance"})))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/trending_coins").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("maintenance"));
}

#[tokio::test]
async fn test_malformed_upstream_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/global"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let (status, body) = get(&app, "/global_market_data").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
