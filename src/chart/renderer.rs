//! Chart Renderer
//!
//! Draws a single-series line chart with plotters and returns it as base64
//! PNG text, ready to embed in a JSON payload or an `<img src="data:...">`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{TimeZone, Utc};
use plotters::prelude::*;
use plotters::style::FontTransform;
use tracing::debug;

use crate::chart::{ChartSpec, TimeSeriesPoint};
use crate::error::RenderError;

const BACKGROUND: RGBColor = RGBColor(0x1f, 0x1f, 0x1f);
const TEXT: RGBColor = RGBColor(0xee, 0xee, 0xee);
const GRID: RGBColor = RGBColor(0x33, 0x33, 0x33);
const AXIS: RGBColor = RGBColor(0x77, 0x77, 0x77);

/// Half a day, used to widen the x axis around a single sample.
const SINGLE_POINT_PADDING_MS: i64 = 12 * 60 * 60 * 1000;

// == Chart Renderer ==
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    /// Where the intermediate PNG is written; system temp dir when unset
    scratch_dir: Option<PathBuf>,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    // == Render ==
    /// Renders `spec` to base64-encoded PNG.
    ///
    /// The drawing surface is a named temp file owned by this call; it is
    /// removed when the guard drops, whether drawing succeeded or not.
    pub fn render(&self, spec: &ChartSpec) -> Result<String, RenderError> {
        if spec.series.is_empty() {
            return Err(RenderError::EmptySeries);
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("chart-").suffix(".png");
        let surface = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| RenderError::Drawing(format!("cannot allocate drawing surface: {}", e)))?;

        draw_line_chart(surface.path(), (self.width, self.height), spec)
            .map_err(|e| RenderError::Drawing(format!("{:#}", e)))?;

        let png = std::fs::read(surface.path())
            .map_err(|e| RenderError::Encoding(format!("cannot read rendered chart: {}", e)))?;
        if png.is_empty() {
            return Err(RenderError::Encoding("rendered chart is empty".to_string()));
        }

        debug!(
            "Rendered chart '{}' ({} points, {} bytes)",
            spec.title,
            spec.series.len(),
            png.len()
        );
        Ok(BASE64.encode(png))
    }

    // == Render Blocking ==
    /// Runs [`ChartRenderer::render`] on the blocking pool.
    pub async fn render_blocking(&self, spec: ChartSpec) -> Result<String, RenderError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render(&spec))
            .await
            .map_err(|e| RenderError::Drawing(format!("render task failed: {}", e)))?
    }
}

/// Draws the chart into a PNG file at `path`.
fn draw_line_chart(path: &Path, size: (u32, u32), spec: &ChartSpec) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&BACKGROUND)?;

    let (x_range, y_range) = axis_ranges(&spec.series);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24).into_font().color(&TEXT))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    let x_formatter = |ms: &i64| format_date(*ms);
    let y_formatter = |value: &f64| abbreviate(*value);

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(spec.y_axis_label.as_str())
        .x_labels(8)
        .y_labels(8)
        .axis_style(ShapeStyle::from(&AXIS).stroke_width(1))
        .bold_line_style(ShapeStyle::from(&GRID).stroke_width(1))
        .light_line_style(ShapeStyle::from(&BACKGROUND).stroke_width(0))
        .axis_desc_style(("sans-serif", 16).into_font().color(&TEXT))
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&TEXT),
        )
        .y_label_style(("sans-serif", 13).into_font().color(&TEXT))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter);
    if !spec.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(LineSeries::new(
        spec.series
            .iter()
            .map(|point| (point.timestamp.timestamp_millis(), point.value)),
        spec.stroke_color.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Computes padded axis ranges; degenerate spans are widened so plotters
/// always receives a non-empty range.
fn axis_ranges(series: &[TimeSeriesPoint]) -> (std::ops::Range<i64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (i64::MAX, i64::MIN);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for point in series {
        let x = point.timestamp.timestamp_millis();
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(point.value);
        y_max = y_max.max(point.value);
    }

    if x_min >= x_max {
        x_min -= SINGLE_POINT_PADDING_MS;
        x_max += SINGLE_POINT_PADDING_MS;
    }

    let span = y_max - y_min;
    let padding = if span > 0.0 {
        span * 0.05
    } else {
        (y_max.abs() * 0.05).max(1.0)
    };

    (x_min..x_max, (y_min - padding)..(y_max + padding))
}

fn format_date(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Shortens large axis values: 1_250_000 -> "1.25M".
fn abbreviate(value: f64) -> String {
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= 1e12 {
        (value / 1e12, "T")
    } else if magnitude >= 1e9 {
        (value / 1e9, "B")
    } else if magnitude >= 1e6 {
        (value / 1e6, "M")
    } else if magnitude >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };

    if suffix.is_empty() && magnitude < 1.0 {
        format!("{:.4}", scaled)
    } else {
        format!("{:.2}{}", scaled, suffix)
    }
}
