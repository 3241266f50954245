//! Canonical Table Module
//! Records, the normalized table and the borrowed views derived from it.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Numeric count columns of the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TotalCases,
        Metric::NewCases,
        Metric::TotalDeaths,
        Metric::NewDeaths,
    ];

    /// Canonical column name.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalCases => "total_cases",
            Metric::NewCases => "new_cases",
            Metric::TotalDeaths => "total_deaths",
            Metric::NewDeaths => "new_deaths",
        }
    }

    /// Human readable label used in chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalCases => "Total Cases",
            Metric::NewCases => "New Cases",
            Metric::TotalDeaths => "Total Deaths",
            Metric::NewDeaths => "New Deaths",
        }
    }
}

/// One row of the canonical table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub location: String,
    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
}

impl Record {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalCases => self.total_cases,
            Metric::NewCases => self.new_cases,
            Metric::TotalDeaths => self.total_deaths,
            Metric::NewDeaths => self.new_deaths,
        }
    }
}

/// A row after per-value coercion and before the drop/fill policy is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub total_cases: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_deaths: Option<f64>,
}

impl RawRecord {
    /// True when the row carries a date and a non-blank location.
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
            && self
                .location
                .as_deref()
                .is_some_and(|loc| !loc.trim().is_empty())
    }
}

/// Normalized table, sorted ascending by date.
///
/// Only built by the schema normalizer and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub(crate) fn from_sorted(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest date present, `None` for an empty table.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Sorted distinct locations.
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.location.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Read-only projection over a [`Table`].
#[derive(Debug, Clone, Default)]
pub struct View<'a> {
    records: Vec<&'a Record>,
}

/// Records of one location in date order.
pub type CountrySeries<'a> = View<'a>;
/// Records on the latest date.
pub type Snapshot<'a> = View<'a>;
/// Snapshot records ordered by a metric, truncated to N.
pub type Ranking<'a> = View<'a>;

impl<'a> View<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one metric in view order.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.iter().map(|r| r.value(metric)).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }
}
