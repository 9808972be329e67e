//! Error types for the market data proxy
//!
//! Each component reports its own thiserror enum; the HTTP boundary folds them
//! into [`ApiError`], which knows how to turn itself into a JSON response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Message surfaced to clients when the upstream API throttles us.
pub const RATE_LIMIT_MESSAGE: &str = "API rate limit exceeded. Please try again later.";

// == Fetch Error ==
/// Failures of the fetch-and-cache gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Upstream answered 429
    #[error("{0}")]
    RateLimited(String),

    /// DNS, connect, or timeout failure
    #[error("Could not reach the market data API: {0}")]
    Network(String),

    /// Any other non-2xx status
    #[error("Market data API returned HTTP status {0}")]
    HttpStatus(u16),

    /// Body was not valid JSON, or lacked a required field
    #[error("Malformed response from market data API: {0}")]
    MalformedResponse(String),

    /// 2xx response whose body carried an `error` field
    #[error("Market data API reported an error: {0}")]
    UpstreamError(String),
}

// == Render Error ==
/// Failures of the chart renderer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Cannot render a chart from an empty series")]
    EmptySeries,

    #[error("Chart drawing failed: {0}")]
    Drawing(String),

    #[error("Chart encoding failed: {0}")]
    Encoding(String),
}

// == API Error ==
/// Unified error type for the HTTP boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad path parameter (unknown `days`, malformed coin id)
    #[error("{0}")]
    InvalidParameter(String),

    /// Upstream had nothing to chart
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code the boundary answers with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Unknown coin ids come back from upstream as 404
            ApiError::Fetch(FetchError::HttpStatus(404)) => StatusCode::NOT_FOUND,
            ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Render(RenderError::EmptySeries) => StatusCode::NOT_FOUND,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
