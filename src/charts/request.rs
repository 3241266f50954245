//! Chart Request Module
//! Declarative rendering requests handed to a presenter, plus color scales.

use chrono::NaiveDate;

/// Plain RGB color shared by the static and interactive backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLUE: Rgb = Rgb(0, 0, 255);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const NAN_GRAY: Rgb = Rgb(200, 200, 200);

// Anchor colors sampled from the matplotlib maps of the same name
const BLUES: [Rgb; 5] = [
    Rgb(247, 251, 255),
    Rgb(198, 219, 239),
    Rgb(107, 174, 214),
    Rgb(33, 113, 181),
    Rgb(8, 48, 107),
];
const REDS: [Rgb; 5] = [
    Rgb(255, 245, 240),
    Rgb(252, 187, 161),
    Rgb(251, 106, 74),
    Rgb(203, 24, 29),
    Rgb(103, 0, 13),
];
const COOLWARM: [Rgb; 3] = [Rgb(59, 76, 192), Rgb(221, 221, 221), Rgb(180, 4, 38)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Blues,
    /// Dark for the first item, light for the last
    BluesReversed,
    Reds,
    CoolWarm,
}

impl ColorScale {
    /// Color at position `t` in `[0, 1]`; out-of-range input is clamped.
    pub fn sample(self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (anchors, t): (&[Rgb], f64) = match self {
            ColorScale::Blues => (&BLUES, t),
            ColorScale::BluesReversed => (&BLUES, 1.0 - t),
            ColorScale::Reds => (&REDS, t),
            ColorScale::CoolWarm => (&COOLWARM, t),
        };

        let scaled = t * (anchors.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(anchors.len() - 1);
        let frac = scaled - lower as f64;

        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (anchors[lower], anchors[upper]);
        Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Color for `value` within `[min, max]`; NaN maps to gray.
    pub fn color_for(self, value: f64, min: f64, max: f64) -> Rgb {
        if value.is_nan() {
            return NAN_GRAY;
        }
        let span = max - min;
        if span <= 0.0 {
            return self.sample(1.0);
        }
        self.sample((value - min) / span)
    }
}

/// Dated line plotted in a time series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Heatmap,
    Choropleth,
}

/// Data and encoding of one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    TimeSeries(Vec<LineSeries>),
    Categorical {
        bars: Vec<BarValue>,
        scale: ColorScale,
    },
    Matrix {
        labels: Vec<String>,
        values: Vec<Vec<f64>>,
        scale: ColorScale,
    },
    Regions {
        regions: Vec<BarValue>,
        scale: ColorScale,
    },
}

impl ChartBody {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartBody::TimeSeries(_) => ChartKind::Line,
            ChartBody::Categorical { .. } => ChartKind::Bar,
            ChartBody::Matrix { .. } => ChartKind::Heatmap,
            ChartBody::Regions { .. } => ChartKind::Choropleth,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartBody::TimeSeries(series) => series.iter().all(|s| s.points.is_empty()),
            ChartBody::Categorical { bars, .. } => bars.is_empty(),
            ChartBody::Matrix { values, .. } => values.is_empty(),
            ChartBody::Regions { regions, .. } => regions.is_empty(),
        }
    }
}

/// A single chart for the presentation layer to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// File name (without extension) used by file-based presenters
    pub file_stem: String,
    pub body: ChartBody,
}

impl ChartRequest {
    pub fn kind(&self) -> ChartKind {
        self.body.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    NoData,
    NotEnoughData,
}

/// User-visible message shown instead of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::NoData,
            message: message.into(),
        }
    }

    pub fn not_enough_data(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::NotEnoughData,
            message: message.into(),
        }
    }
}

/// Short form for tile and axis labels: 1.2M, 35.0k, 512.
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}
