//! Report Module
//! Turns derived views into chart requests or notices and hands them to a presenter.

use crate::charts::{
    BarValue, ChartBody, ChartRequest, ColorScale, LineSeries, Notice, RenderError, Rgb, BLUE,
    RED,
};
use crate::config::Settings;
use crate::data::{CountrySeries, Metric, Ranking, Snapshot, Table};
use crate::stats::{Aggregator, CorrelationCalculator};
use tracing::{info, warn};

/// One output of a report run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportItem {
    Chart(ChartRequest),
    Notice(Notice),
}

/// Rendering collaborator. Only receives non-empty chart requests.
pub trait Presenter {
    fn render(&mut self, request: &ChartRequest) -> Result<(), RenderError>;
    fn notify(&mut self, notice: &Notice);
}

/// Line chart of the selected metrics for one country.
pub fn country_timeline(
    series: &CountrySeries<'_>,
    lines: &[(Metric, Rgb)],
    title: String,
    empty_message: String,
) -> ReportItem {
    if series.is_empty() {
        return ReportItem::Notice(Notice::no_data(empty_message));
    }

    let series = lines
        .iter()
        .map(|&(metric, color)| LineSeries {
            name: metric.label().to_string(),
            color,
            points: series.iter().map(|r| (r.date, r.value(metric))).collect(),
        })
        .collect();

    ReportItem::Chart(ChartRequest {
        title,
        x_label: "Date".to_string(),
        y_label: "Count".to_string(),
        file_stem: "country_timeseries".to_string(),
        body: ChartBody::TimeSeries(series),
    })
}

/// Bar chart of a ranking, darkest bar first.
pub fn ranking_bars(
    ranking: &Ranking<'_>,
    metric: Metric,
    title: String,
    empty_message: String,
) -> ReportItem {
    if ranking.is_empty() {
        return ReportItem::Notice(Notice::no_data(empty_message));
    }

    let bars = ranking
        .iter()
        .map(|r| BarValue {
            label: r.location.clone(),
            value: r.value(metric),
        })
        .collect();

    ReportItem::Chart(ChartRequest {
        title,
        x_label: "Location".to_string(),
        y_label: metric.label().to_string(),
        file_stem: "top_countries".to_string(),
        body: ChartBody::Categorical {
            bars,
            scale: ColorScale::BluesReversed,
        },
    })
}

/// Correlation heatmap, or a notice when the series has fewer than two valid rows.
pub fn correlation_heatmap(series: &CountrySeries<'_>, country: &str) -> ReportItem {
    let Some(matrix) = CorrelationCalculator::compute(series) else {
        return ReportItem::Notice(Notice::not_enough_data(format!(
            "Not enough {country} data to compute correlation heatmap."
        )));
    };

    ReportItem::Chart(ChartRequest {
        title: format!("Correlation Heatmap ({country} COVID Data)"),
        x_label: String::new(),
        y_label: String::new(),
        file_stem: "correlation_heatmap".to_string(),
        body: ChartBody::Matrix {
            labels: matrix.metrics.iter().map(|m| m.column().to_string()).collect(),
            values: matrix.values.iter().map(|row| row.to_vec()).collect(),
            scale: ColorScale::CoolWarm,
        },
    })
}

/// World map of the latest snapshot colored by `metric`.
pub fn world_choropleth(snapshot: &Snapshot<'_>, metric: Metric) -> ReportItem {
    if snapshot.is_empty() {
        return ReportItem::Notice(Notice::no_data("No latest data for choropleth."));
    }

    let regions = snapshot
        .iter()
        .map(|r| BarValue {
            label: r.location.clone(),
            value: r.value(metric),
        })
        .collect();

    ReportItem::Chart(ChartRequest {
        title: "Worldwide COVID-19 Cases".to_string(),
        x_label: String::new(),
        y_label: metric.label().to_string(),
        file_stem: "world_choropleth".to_string(),
        body: ChartBody::Regions {
            regions,
            scale: ColorScale::Reds,
        },
    })
}

/// The four charts of the batch report.
pub fn batch_report(table: &Table, settings: &Settings) -> Vec<ReportItem> {
    let country = settings.focus_country.as_str();
    let n = settings.top_n;

    let series = Aggregator::select_country(table, country);
    let latest = Aggregator::latest_snapshot(table);
    let ranking = Aggregator::top_n(&latest, n, Metric::TotalCases);

    vec![
        country_timeline(
            &series,
            &[(Metric::TotalCases, BLUE), (Metric::TotalDeaths, RED)],
            format!("COVID-19 Cases & Deaths in {country}"),
            format!("No {country} data available to plot time series."),
        ),
        ranking_bars(
            &ranking,
            Metric::TotalCases,
            format!("Top {n} Countries by Total Cases"),
            format!("No latest snapshot available for Top {n} chart."),
        ),
        correlation_heatmap(&series, country),
        world_choropleth(&latest, Metric::TotalCases),
    ]
}

/// Views for the dashboard's selected country.
pub fn dashboard_report(table: &Table, country: &str, n: usize) -> Vec<ReportItem> {
    let series = Aggregator::select_country(table, country);
    let latest = Aggregator::latest_snapshot(table);
    let ranking = Aggregator::top_n(&latest, n, Metric::TotalCases);

    let ranking_title = match latest.first_date() {
        Some(date) => format!("Top {n} Countries by Total Cases on {date}"),
        None => format!("Top {n} Countries by Total Cases"),
    };

    vec![
        country_timeline(
            &series,
            &[(Metric::TotalCases, BLUE)],
            format!("COVID-19 Total Cases in {country}"),
            "No data available for the selected country.".to_string(),
        ),
        ranking_bars(
            &ranking,
            Metric::TotalCases,
            ranking_title,
            format!("No latest snapshot available to display top {n} chart."),
        ),
        correlation_heatmap(&series, country),
        world_choropleth(&latest, Metric::TotalCases),
    ]
}

/// Send every item to the presenter; returns the number of charts rendered.
pub fn present(items: &[ReportItem], presenter: &mut dyn Presenter) -> Result<usize, RenderError> {
    let mut rendered = 0;
    for item in items {
        match item {
            ReportItem::Chart(request) => {
                presenter.render(request)?;
                rendered += 1;
            }
            ReportItem::Notice(notice) => {
                warn!(kind = ?notice.kind, "{}", notice.message);
                presenter.notify(notice);
            }
        }
    }
    info!(charts = rendered, notices = items.len() - rendered, "report presented");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, NoticeKind};
    use crate::data::{RawRecord, SchemaNormalizer};
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingPresenter {
        charts: Vec<ChartRequest>,
        notices: Vec<Notice>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, request: &ChartRequest) -> Result<(), RenderError> {
            assert!(!request.body.is_empty(), "empty view reached the presenter");
            self.charts.push(request.clone());
            Ok(())
        }

        fn notify(&mut self, notice: &Notice) {
            self.notices.push(notice.clone());
        }
    }

    fn raw(date: &str, location: &str, total_cases: f64, total_deaths: f64) -> RawRecord {
        RawRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            location: Some(location.to_string()),
            total_cases: Some(total_cases),
            total_deaths: Some(total_deaths),
            ..Default::default()
        }
    }

    fn sample_table() -> Table {
        SchemaNormalizer::finalize(vec![
            raw("2021-01-01", "India", 100.0, 1.0),
            raw("2021-01-02", "India", 150.0, 3.0),
            raw("2021-01-02", "China", 500.0, 9.0),
        ])
    }

    #[test]
    fn test_empty_table_only_produces_notices() {
        let items = batch_report(&Table::default(), &Settings::default());
        let mut presenter = RecordingPresenter::default();

        let rendered = present(&items, &mut presenter).unwrap();

        assert_eq!(rendered, 0);
        let messages: Vec<&str> = presenter.notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "No India data available to plot time series.",
                "No latest snapshot available for Top 10 chart.",
                "Not enough India data to compute correlation heatmap.",
                "No latest data for choropleth.",
            ]
        );
        assert_eq!(presenter.notices[2].kind, NoticeKind::NotEnoughData);
        assert_eq!(presenter.notices[0].kind, NoticeKind::NoData);
    }

    #[test]
    fn test_batch_report_renders_all_charts() {
        let items = batch_report(&sample_table(), &Settings::default());
        let mut presenter = RecordingPresenter::default();

        assert_eq!(present(&items, &mut presenter).unwrap(), 4);
        let kinds: Vec<ChartKind> = presenter.charts.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Line,
                ChartKind::Bar,
                ChartKind::Heatmap,
                ChartKind::Choropleth
            ]
        );

        match &presenter.charts[1].body {
            ChartBody::Categorical { bars, .. } => {
                let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
                assert_eq!(labels, vec!["China", "India"]);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_single_row_country_skips_correlation_only() {
        let table = SchemaNormalizer::finalize(vec![raw("2021-01-01", "Peru", 1.0, 0.0)]);
        let settings = Settings {
            focus_country: "Peru".to_string(),
            ..Settings::default()
        };

        let items = batch_report(&table, &settings);
        assert!(matches!(items[0], ReportItem::Chart(_)));
        assert!(matches!(
            &items[2],
            ReportItem::Notice(n) if n.kind == NoticeKind::NotEnoughData
        ));
    }

    #[test]
    fn test_dashboard_titles() {
        let items = dashboard_report(&sample_table(), "India", 10);
        match &items[1] {
            ReportItem::Chart(request) => {
                assert_eq!(request.title, "Top 10 Countries by Total Cases on 2021-01-02")
            }
            other => panic!("unexpected item: {other:?}"),
        }

        let items = dashboard_report(&sample_table(), "Atlantis", 10);
        assert_eq!(
            items[0],
            ReportItem::Notice(Notice::no_data("No data available for the selected country."))
        );
    }
}
