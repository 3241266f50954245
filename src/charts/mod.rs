//! Charts module - Chart requests and rendering

mod plotter;
mod renderer;
mod request;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use request::{
    compact_number, BarValue, ChartBody, ChartKind, ChartRequest, ColorScale, LineSeries, Notice,
    NoticeKind, Rgb, BLUE, NAN_GRAY, RED,
};
