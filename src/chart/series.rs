//! Time Series Input
//!
//! Chart input types and the flattening of upstream `[[epoch_ms, value], ...]`
//! arrays into points.

use chrono::{DateTime, TimeZone, Utc};
use plotters::style::RGBColor;
use serde_json::Value;

// == Time Series Point ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Builds a point from an epoch-milliseconds timestamp.
    pub fn from_millis(epoch_ms: i64, value: f64) -> Option<Self> {
        let timestamp = Utc.timestamp_millis_opt(epoch_ms).single()?;
        Some(Self::new(timestamp, value))
    }
}

// == Chart Spec ==
/// Everything one render call needs.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Points in chronological order; drawn as given
    pub series: Vec<TimeSeriesPoint>,
    pub title: String,
    pub y_axis_label: String,
    pub stroke_color: RGBColor,
    pub show_grid: bool,
}

impl ChartSpec {
    pub fn new(
        series: Vec<TimeSeriesPoint>,
        title: impl Into<String>,
        y_axis_label: impl Into<String>,
        stroke_color: RGBColor,
    ) -> Self {
        Self {
            series,
            title: title.into(),
            y_axis_label: y_axis_label.into(),
            stroke_color,
            show_grid: true,
        }
    }

    pub fn without_grid(mut self) -> Self {
        self.show_grid = false;
        self
    }
}

// == Parsing ==
/// Flattens an upstream pair array into points, preserving order.
///
/// Entries that are not `[number, number]` are skipped; a missing or
/// non-array field yields an empty series.
pub fn series_from_pairs(pairs: Option<&Value>) -> Vec<TimeSeriesPoint> {
    let Some(items) = pairs.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let pair = item.as_array()?;
            let epoch_ms = pair.first()?.as_f64()?;
            let value = pair.get(1)?.as_f64()?;
            TimeSeriesPoint::from_millis(epoch_ms as i64, value)
        })
        .collect()
}

/// Parses `#rrggbb` (leading `#` optional) into a colour.
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
