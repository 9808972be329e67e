//! Crypto Tracker - a caching proxy for cryptocurrency market data
//!
//! Fetches from a public market data API through a bounded response cache,
//! shapes the payloads for a lightweight front end, and renders time series
//! as base64 PNG line charts.

pub mod api;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
