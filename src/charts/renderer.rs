//! Static Chart Renderer
//! Draws chart requests with plotters into an in-memory buffer and writes PNG files.
//!
//! Layouts:
//! - Line: dated x-axis, one colored line per series, legend upper left
//! - Bar: one bar per label, rotated labels, color by rank
//! - Heatmap: annotated square matrix on a diverging scale
//! - Choropleth: tile map, one tile per location, largest value first

use super::request::{self, compact_number, BarValue, ChartBody, ChartRequest, ColorScale, Notice, Rgb};
use crate::config::Settings;
use crate::report::Presenter;
use chrono::{Duration, NaiveDate};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::error::Error as StdError;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn StdError>>;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Chart buffer does not match {0}x{1} pixels")]
    Buffer(u32, u32),
    #[error("Failed to write chart image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes one PNG per chart request into the output directory.
pub struct StaticChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    open_charts: bool,
    written: Vec<PathBuf>,
}

impl StaticChartRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            output_dir: settings.output_dir.clone(),
            width: settings.chart_width,
            height: settings.chart_height,
            open_charts: settings.open_charts,
            written: Vec::new(),
        }
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Render a request to an RGB image without touching the filesystem.
    pub fn render_to_image(&self, request: &ChartRequest) -> Result<RgbImage, RenderError> {
        let (w, h) = (self.width, self.height);
        let mut buffer = vec![0u8; (w as usize) * (h as usize) * 3];

        Self::draw(request, &mut buffer, (w, h))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        RgbImage::from_raw(w, h, buffer).ok_or(RenderError::Buffer(w, h))
    }

    fn draw(request: &ChartRequest, buffer: &mut [u8], size: (u32, u32)) -> DrawResult {
        let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
        root.fill(&WHITE)?;

        match &request.body {
            ChartBody::TimeSeries(lines) => Self::draw_time_series(&root, request, lines)?,
            ChartBody::Categorical { bars, scale } => {
                Self::draw_bars(&root, request, bars, *scale)?
            }
            ChartBody::Matrix {
                labels,
                values,
                scale,
            } => Self::draw_heatmap(&root, request, labels, values, *scale)?,
            ChartBody::Regions { regions, scale } => {
                Self::draw_tile_map(&root, request, regions, *scale)?
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_time_series(
        root: &Area<'_>,
        request: &ChartRequest,
        lines: &[request::LineSeries],
    ) -> DrawResult {
        let dates = lines.iter().flat_map(|l| l.points.iter().map(|(d, _)| *d));
        let (Some(start), Some(end)) = (dates.clone().min(), dates.max()) else {
            return Ok(());
        };
        let span = (end - start).num_days().max(1);
        let (y_min, y_max) = value_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));

        let mut chart = ChartBuilder::on(root)
            .caption(&request.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(0i64..span, y_min..y_max)?;

        let date_label = |offset: &i64| {
            (start + Duration::days(*offset))
                .format("%Y-%m-%d")
                .to_string()
        };
        chart
            .configure_mesh()
            .x_desc(&request.x_label)
            .y_desc(&request.y_label)
            .x_labels(8)
            .x_label_formatter(&date_label)
            .y_label_formatter(&|v| compact_number(*v))
            .draw()?;

        for line in lines {
            let color = to_rgb(line.color);
            chart
                .draw_series(LineSeries::new(
                    line.points.iter().map(|(d, v)| (days_between(start, *d), *v)),
                    color.stroke_width(2),
                ))?
                .label(line.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }

    fn draw_bars(
        root: &Area<'_>,
        request: &ChartRequest,
        bars: &[BarValue],
        scale: ColorScale,
    ) -> DrawResult {
        let n = bars.len() as u32;
        let (y_min, y_max) = value_range(bars.iter().map(|b| b.value));
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(&request.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..n).into_segmented(), y_min..y_max)?;

        let bar_label = |seg: &SegmentValue<u32>| match seg {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n as usize)
            .x_label_style((FONT, 14).into_font().transform(FontTransform::Rotate90))
            .x_label_formatter(&bar_label)
            .y_label_formatter(&|v| compact_number(*v))
            .x_desc(&request.x_label)
            .y_desc(&request.y_label)
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let i = i as u32;
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), bar.value),
                ],
                to_rgb(scale.sample(t)).filled(),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))?;

        Ok(())
    }

    fn draw_heatmap(
        root: &Area<'_>,
        request: &ChartRequest,
        labels: &[String],
        values: &[Vec<f64>],
        scale: ColorScale,
    ) -> DrawResult {
        let k = labels.len() as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(&request.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(120)
            .build_cartesian_2d((0u32..k).into_segmented(), (0u32..k).into_segmented())?;

        // Row 0 is drawn at the top
        let x_label = |seg: &SegmentValue<u32>| match seg {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_label = |seg: &SegmentValue<u32>| match seg {
            SegmentValue::CenterOf(i) if *i < k => {
                labels.get((k - 1 - i) as usize).cloned().unwrap_or_default()
            }
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(k as usize)
            .y_labels(k as usize)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .draw()?;

        let cells: Vec<(u32, u32, f64)> = values
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(move |(col, v)| (col as u32, k - 1 - row as u32, *v))
            })
            .collect();

        chart.draw_series(cells.iter().map(|&(x, y, v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                to_rgb(scale.color_for(v, -1.0, 1.0)).filled(),
            )
        }))?;

        let annotation =
            TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(cells.iter().map(|&(x, y, v)| {
            let text = if v.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.2}", v)
            };
            Text::new(
                text,
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                annotation.clone(),
            )
        }))?;

        Ok(())
    }

    fn draw_tile_map(
        root: &Area<'_>,
        request: &ChartRequest,
        regions: &[BarValue],
        scale: ColorScale,
    ) -> DrawResult {
        let mut ordered: Vec<&BarValue> = regions.iter().collect();
        ordered.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let (min, max) = value_range(ordered.iter().map(|r| r.value));

        let area = root.titled(&request.title, (FONT, 28))?;
        let area = area.margin(10, 10, 10, 10);
        let (rows, cols) = tile_grid(ordered.len());
        let tiles = area.split_evenly((rows, cols));

        for (tile, region) in tiles.iter().zip(&ordered) {
            let fill = scale.color_for(region.value, min, max);
            tile.fill(&to_rgb(fill))?;

            let (w, h) = tile.dim_in_pixel();
            tile.draw(&Rectangle::new(
                [(0, 0), (w as i32 - 1, h as i32 - 1)],
                WHITE.stroke_width(1),
            ))?;

            let text_color = if is_dark(fill) { WHITE } else { BLACK };
            let size = f64::from((h / 4).clamp(8, 16));
            let style = TextStyle::from((FONT, size).into_font()).color(&text_color);
            tile.draw_text(&truncate(&region.label, 14), &style, (4, 4))?;
            tile.draw_text(&compact_number(region.value), &style, (4, 6 + size as i32))?;
        }

        Ok(())
    }
}

impl Presenter for StaticChartRenderer {
    fn render(&mut self, request: &ChartRequest) -> Result<(), RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let image = self.render_to_image(request)?;
        let path = self.output_dir.join(format!("{}.png", request.file_stem));
        image.save(&path)?;
        info!(path = %path.display(), kind = ?request.kind(), "wrote chart");

        if self.open_charts {
            if let Err(e) = open::that(&path) {
                warn!(path = %path.display(), "could not open chart: {}", e);
            }
        }
        self.written.push(path);
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        println!("{}", notice.message);
    }
}

fn to_rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn is_dark(color: Rgb) -> bool {
    let luma = 0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64;
    luma < 128.0
}

fn days_between(start: NaiveDate, date: NaiveDate) -> i64 {
    (date - start).num_days()
}

/// Axis range covering zero and every finite value, padded on top.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max <= min {
        (min, min + 1.0)
    } else {
        (min, max * 1.05)
    }
}

/// Rows and columns of a near-square grid holding `n` tiles.
fn tile_grid(n: usize) -> (usize, usize) {
    if n == 0 {
        return (1, 1);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    (n.div_ceil(cols), cols)
}

fn truncate(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars - 1).collect();
        format!("{head}…")
    }
}
