//! Request and Response models for the market data API
//!
//! Path parameter types on the way in, simplified DTOs on the way out.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CoinId, Days, ACCEPTED_DAYS};
pub use responses::{
    CacheStatsResponse, ChartResponse, CoinDetailsResponse, ErrorResponse, GlobalMarketResponse,
    HealthResponse, TrendingCoin,
};
