//! Chart Plotter Module
//! Draws chart requests interactively using egui_plot.

use super::request::{self, compact_number, BarValue, ChartBody, ChartRequest, ColorScale, Rgb};
use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, FontId, RichText, Sense};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

const PLOT_HEIGHT: f32 = 320.0;
const CELL_SIZE: [f32; 2] = [110.0, 36.0];
const TILE_SIZE: [f32; 2] = [120.0, 44.0];

/// Creates interactive charts from chart requests.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn to_color32(color: Rgb) -> Color32 {
        Color32::from_rgb(color.0, color.1, color.2)
    }

    /// Draw a titled chart for any request kind.
    pub fn draw_request(ui: &mut egui::Ui, request: &ChartRequest) {
        ui.label(RichText::new(&request.title).size(16.0).strong());
        ui.add_space(6.0);

        match &request.body {
            ChartBody::TimeSeries(lines) => Self::draw_time_series(ui, request, lines),
            ChartBody::Categorical { bars, scale } => Self::draw_bars(ui, request, bars, *scale),
            ChartBody::Matrix {
                labels,
                values,
                scale,
            } => Self::draw_heatmap(ui, labels, values, *scale),
            ChartBody::Regions { regions, scale } => Self::draw_tiles(ui, regions, *scale),
        }
    }

    /// X values are days from the common era so they round-trip to dates.
    fn draw_time_series(ui: &mut egui::Ui, request: &ChartRequest, lines: &[request::LineSeries]) {
        Plot::new(format!("plot_{}", request.file_stem))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(request.x_label.as_str())
            .y_axis_label(request.y_label.as_str())
            .x_axis_formatter(|mark, _range| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| compact_number(mark.value))
            .show(ui, |plot_ui| {
                for line in lines {
                    let points: PlotPoints = line
                        .points
                        .iter()
                        .map(|(d, v)| [d.num_days_from_ce() as f64, *v])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(Self::to_color32(line.color))
                            .width(2.0)
                            .name(&line.name),
                    );
                }
            });
    }

    fn draw_bars(ui: &mut egui::Ui, request: &ChartRequest, bars: &[BarValue], scale: ColorScale) {
        let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
        let n = bars.len();

        let chart_bars: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                Bar::new(i as f64, bar.value)
                    .name(&bar.label)
                    .width(0.6)
                    .fill(Self::to_color32(scale.sample(t)))
            })
            .collect();

        Plot::new(format!("plot_{}", request.file_stem))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(request.x_label.as_str())
            .y_axis_label(request.y_label.as_str())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(|mark, _range| compact_number(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(chart_bars));
            });
    }

    fn draw_heatmap(ui: &mut egui::Ui, labels: &[String], values: &[Vec<f64>], scale: ColorScale) {
        egui::Grid::new(ui.make_persistent_id("correlation_heatmap"))
            .spacing([2.0, 2.0])
            .show(ui, |ui| {
                ui.label("");
                for label in labels {
                    ui.label(RichText::new(label).size(11.0).strong());
                }
                ui.end_row();

                for (label, row) in labels.iter().zip(values) {
                    ui.label(RichText::new(label).size(11.0).strong());
                    for &value in row {
                        let text = if value.is_nan() {
                            "nan".to_string()
                        } else {
                            format!("{:.2}", value)
                        };
                        let _ = Self::colored_cell(ui, CELL_SIZE, scale.color_for(value, -1.0, 1.0), &text);
                    }
                    ui.end_row();
                }
            });
    }

    fn draw_tiles(ui: &mut egui::Ui, regions: &[BarValue], scale: ColorScale) {
        let mut ordered: Vec<&BarValue> = regions.iter().collect();
        ordered.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let max = ordered.first().map(|r| r.value).unwrap_or(0.0);
        let min = ordered.last().map(|r| r.value).unwrap_or(0.0);

        egui::ScrollArea::vertical()
            .id_salt("world_tiles")
            .max_height(PLOT_HEIGHT)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(2.0, 2.0);
                    for region in ordered {
                        let text = format!("{}\n{}", region.label, compact_number(region.value));
                        Self::colored_cell(ui, TILE_SIZE, scale.color_for(region.value, min, max), &text)
                            .on_hover_text(format!("{}: {}", region.label, region.value));
                    }
                });
            });
    }

    fn colored_cell(ui: &mut egui::Ui, size: [f32; 2], fill: Rgb, text: &str) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(egui::vec2(size[0], size[1]), Sense::hover());
        let luma = 0.299 * fill.0 as f32 + 0.587 * fill.1 as f32 + 0.114 * fill.2 as f32;
        let text_color = if luma < 128.0 {
            Color32::WHITE
        } else {
            Color32::BLACK
        };

        let painter = ui.painter();
        painter.rect_filled(rect, 3.0, Self::to_color32(fill));
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(11.0),
            text_color,
        );
        response
    }
}
