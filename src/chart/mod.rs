//! Chart Module
//!
//! Turns upstream time series into embeddable line-chart images.

mod renderer;
mod series;

pub use renderer::ChartRenderer;
pub use series::{parse_hex_color, series_from_pairs, ChartSpec, TimeSeriesPoint};
