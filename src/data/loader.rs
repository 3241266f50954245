//! CSV Data Loader Module
//! Reads the flat source file into a raw DataFrame using Polars.

use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
}

/// Handles CSV file loading. No transformation happens here.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with every column kept as text.
    ///
    /// An empty (or whitespace-only) file gives an empty DataFrame.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = file_path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            info!(path = %path.display(), "source file is empty");
            return Ok(DataFrame::empty());
        }

        // Schema inference off: values stay verbatim until the normalizer coerces them
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );
        debug!("{}", df.head(Some(5)));

        Ok(df)
    }

    /// Column names in file order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_csv(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_empty_file_gives_empty_frame() {
        let file = write_csv("");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn test_values_are_read_verbatim() {
        let file = write_csv("Country_code,Country,Cumulative_cases\n007,India,N/A\n");
        let df = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(
            DataLoader::column_names(&df),
            vec!["Country_code", "Country", "Cumulative_cases"]
        );
        let codes = df.column("Country_code").unwrap().str().unwrap();
        assert_eq!(codes.get(0), Some("007"));
        let cases = df.column("Cumulative_cases").unwrap().str().unwrap();
        assert_eq!(cases.get(0), Some("N/A"));
    }

    #[test]
    fn test_header_only_file_keeps_columns() {
        let file = write_csv("Date_reported,Country\n");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }
}
