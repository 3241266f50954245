use covid_explorer::charts::{ChartRequest, Notice, NoticeKind, RenderError};
use covid_explorer::config::Settings;
use covid_explorer::data::{ColumnMapping, Metric, NormalizeError};
use covid_explorer::pipeline::{self, PipelineError};
use covid_explorer::report::{self, Presenter, ReportItem};
use covid_explorer::stats::Aggregator;
use std::fs;
use std::path::PathBuf;

const HEADER: &str =
    "Date_reported,Country_code,Country,WHO_region,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths";

fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[derive(Default)]
struct Recorder {
    charts: Vec<ChartRequest>,
    notices: Vec<Notice>,
}

impl Presenter for Recorder {
    fn render(&mut self, request: &ChartRequest) -> Result<(), RenderError> {
        self.charts.push(request.clone());
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

#[test]
fn who_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{HEADER}\n\
         2021-01-02,IN,India,SEARO,50,150,1,3\n\
         2021-01-01,IN,India,SEARO,100,100,2,2\n\
         2021-01-02,CN,China,WPRO,20,500,0,9\n\
         garbage,CN,China,WPRO,1,1,1,1\n\
         2021-01-01,,,OTHER,1,1,1,1\n"
    );
    let path = write_csv(&dir, "who.csv", &body);

    let table = pipeline::load_table(&path, &ColumnMapping::batch()).unwrap();
    assert_eq!(table.len(), 3);
    let dates: Vec<_> = table.iter().map(|r| r.date).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));

    let latest = Aggregator::latest_snapshot(&table);
    assert_eq!(latest.len(), 2);
    let top = Aggregator::top_n(&latest, 1, Metric::TotalCases);
    assert_eq!(top.records()[0].location, "China");

    let items = report::batch_report(&table, &Settings::default());
    let mut recorder = Recorder::default();
    assert_eq!(report::present(&items, &mut recorder).unwrap(), 4);
    assert!(recorder.notices.is_empty());
}

#[test]
fn missing_country_column_aborts_before_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "no_country.csv",
        "Date_reported,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths\n\
         2021-01-01,1,1,0,0\n",
    );

    let err = pipeline::load_table(&path, &ColumnMapping::batch()).unwrap_err();
    assert!(err.is_schema_error());
    match err {
        PipelineError::Normalize(NormalizeError::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["Country"])
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_values_never_abort() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{HEADER}\n\
         2021-01-01,IN,India,SEARO,abc,N/A,,?\n\
         2021-13-45,IN,India,SEARO,1,2,3,4\n"
    );
    let path = write_csv(&dir, "dirty.csv", &body);

    let table = pipeline::load_table(&path, &ColumnMapping::batch()).unwrap();
    assert_eq!(table.len(), 1);
    let record = &table.records()[0];
    for metric in Metric::ALL {
        assert_eq!(record.value(metric), 0.0);
    }
}

#[test]
fn empty_file_produces_only_notices() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "empty.csv", "");

    let table = pipeline::load_table(&path, &ColumnMapping::batch()).unwrap();
    assert!(table.is_empty());

    let items = report::batch_report(&table, &Settings::default());
    assert!(items.iter().all(|i| matches!(i, ReportItem::Notice(_))));

    let mut recorder = Recorder::default();
    assert_eq!(report::present(&items, &mut recorder).unwrap(), 0);
    assert!(recorder.charts.is_empty());
    assert_eq!(recorder.notices.len(), 4);
    assert_eq!(recorder.notices[2].kind, NoticeKind::NotEnoughData);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline::load_table(dir.path().join("nope.csv"), &ColumnMapping::batch())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));
    assert!(!err.is_schema_error());
}

#[test]
fn dashboard_mapping_needs_three_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "slim.csv",
        "Date_reported,Country,Cumulative_cases\n2021-01-01,India,10\n2021-01-02,India,12\n",
    );

    assert!(pipeline::load_table(&path, &ColumnMapping::batch()).is_err());

    let table = pipeline::load_table(&path, &ColumnMapping::dashboard()).unwrap();
    let items = report::dashboard_report(&table, "India", 10);
    assert!(matches!(items[0], ReportItem::Chart(_)));
    assert!(matches!(items[1], ReportItem::Chart(_)));
}
