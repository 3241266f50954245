//! Schema Normalizer Module
//! Validates, renames and coerces the raw source columns into the canonical Table.

use super::table::{Metric, RawRecord, Record, Table};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Missing required columns in CSV: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Canonical column a source column is renamed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    Date,
    Location,
    Metric(Metric),
}

impl Canonical {
    pub fn name(self) -> &'static str {
        match self {
            Canonical::Date => "date",
            Canonical::Location => "location",
            Canonical::Metric(metric) => metric.column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source: &'static str,
    pub target: Canonical,
    pub required: bool,
}

/// Fixed mapping from source column names to canonical names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    /// All six WHO columns are required.
    pub fn batch() -> Self {
        Self::with_required(&[
            "Date_reported",
            "Country",
            "Cumulative_cases",
            "New_cases",
            "Cumulative_deaths",
            "New_deaths",
        ])
    }

    /// Only date, country and cumulative cases are required; the rest are
    /// mapped when the file has them.
    pub fn dashboard() -> Self {
        Self::with_required(&["Date_reported", "Country", "Cumulative_cases"])
    }

    fn with_required(required: &[&str]) -> Self {
        let entries = [
            ("Date_reported", Canonical::Date),
            ("Country", Canonical::Location),
            ("Cumulative_cases", Canonical::Metric(Metric::TotalCases)),
            ("New_cases", Canonical::Metric(Metric::NewCases)),
            ("Cumulative_deaths", Canonical::Metric(Metric::TotalDeaths)),
            ("New_deaths", Canonical::Metric(Metric::NewDeaths)),
        ]
        .into_iter()
        .map(|(source, target)| MappingEntry {
            source,
            target,
            required: required.contains(&source),
        })
        .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }
}

/// Turns a raw text DataFrame into the canonical [`Table`].
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Run every stage: schema check, rename, coercion, drop/sort/fill.
    ///
    /// A frame with no columns at all (empty source file) yields an empty Table.
    pub fn normalize(raw: DataFrame, mapping: &ColumnMapping) -> Result<Table, NormalizeError> {
        if raw.width() == 0 {
            info!("no columns in source, producing an empty table");
            return Ok(Table::default());
        }

        Self::check_schema(&raw, mapping)?;
        let renamed = Self::rename_columns(raw, mapping)?;
        let coerced = Self::coerce(&renamed)?;
        let total = coerced.len();
        let table = Self::finalize(coerced);

        info!(
            rows = table.len(),
            dropped = total - table.len(),
            "normalized source table"
        );
        Ok(table)
    }

    /// Fail with the list of required source columns that are absent.
    pub fn check_schema(raw: &DataFrame, mapping: &ColumnMapping) -> Result<(), NormalizeError> {
        let columns = raw.get_column_names();
        let missing: Vec<String> = mapping
            .entries()
            .iter()
            .filter(|e| e.required && !columns.iter().any(|c| c.as_str() == e.source))
            .map(|e| e.source.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(NormalizeError::MissingColumns(missing))
        }
    }

    /// Rename mapped columns; unmapped ones are left in place.
    pub fn rename_columns(
        mut raw: DataFrame,
        mapping: &ColumnMapping,
    ) -> Result<DataFrame, NormalizeError> {
        for entry in mapping.entries() {
            if raw.get_column_index(entry.source).is_some() {
                raw.rename(entry.source, entry.target.name().into())?;
            }
        }
        Ok(raw)
    }

    /// Per-value coercion of the canonical columns. Never fails on bad values.
    pub fn coerce(df: &DataFrame) -> Result<Vec<RawRecord>, NormalizeError> {
        let dates = Self::coerce_column(df, Canonical::Date.name(), parse_date)?;
        let locations = Self::coerce_column(df, Canonical::Location.name(), |s| {
            Some(s.to_string())
        })?;
        let total_cases = Self::coerce_column(df, Metric::TotalCases.column(), parse_count)?;
        let new_cases = Self::coerce_column(df, Metric::NewCases.column(), parse_count)?;
        let total_deaths = Self::coerce_column(df, Metric::TotalDeaths.column(), parse_count)?;
        let new_deaths = Self::coerce_column(df, Metric::NewDeaths.column(), parse_count)?;

        let records = dates
            .into_iter()
            .zip(locations)
            .zip(total_cases)
            .zip(new_cases)
            .zip(total_deaths)
            .zip(new_deaths)
            .map(
                |(((((date, location), total_cases), new_cases), total_deaths), new_deaths)| {
                    RawRecord {
                        date,
                        location,
                        total_cases,
                        new_cases,
                        total_deaths,
                        new_deaths,
                    }
                },
            )
            .collect();

        Ok(records)
    }

    /// Drop rows without date or location, stable-sort by date, zero-fill counts.
    pub fn finalize(raw: Vec<RawRecord>) -> Table {
        let mut records: Vec<Record> = raw
            .into_iter()
            .filter_map(|r| {
                if !r.is_valid() {
                    return None;
                }
                Some(Record {
                    date: r.date?,
                    location: r.location?,
                    total_cases: r.total_cases.unwrap_or(0.0),
                    new_cases: r.new_cases.unwrap_or(0.0),
                    total_deaths: r.total_deaths.unwrap_or(0.0),
                    new_deaths: r.new_deaths.unwrap_or(0.0),
                })
            })
            .collect();

        records.sort_by_key(|r| r.date);
        Table::from_sorted(records)
    }

    /// Parse one column as text; a column missing from the frame is all absent.
    fn coerce_column<T>(
        df: &DataFrame,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Vec<Option<T>>, NormalizeError> {
        let Ok(column) = df.column(name) else {
            debug!(column = name, "column not present, treating as absent");
            return Ok((0..df.height()).map(|_| None).collect());
        };

        let text = column.cast(&DataType::String)?;
        let values = text
            .str()?
            .into_iter()
            .map(|v| v.and_then(&parse))
            .collect();
        Ok(values)
    }
}

/// Parse a calendar date, keeping only the date part of date-time values.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse a count; non-numeric and non-finite text is absent.
pub fn parse_count(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
