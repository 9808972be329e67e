//! Gateway Module
//!
//! Fetch-and-cache access to the upstream market data API.

mod client;
mod throttle;

pub use client::{FetchGateway, GatewayConfig};
pub use throttle::Throttle;
