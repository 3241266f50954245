//! Settings Module
//! Optional JSON settings file with defaults for every key.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Source data file, read from the working directory.
pub const DATA_FILE: &str = "WHO-COVID-19-global-daily-data.csv";

/// Optional settings file, read from the working directory.
pub const SETTINGS_FILE: &str = "covid_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report and dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Country used for the time series and correlation charts
    pub focus_country: String,
    /// Length of the ranking chart
    pub top_n: usize,
    /// Directory the static charts are written to
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Open each written chart with the system viewer
    pub open_charts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_country: "India".to_string(),
            top_n: 10,
            output_dir: PathBuf::from("charts"),
            chart_width: 1200,
            chart_height: 700,
            open_charts: true,
        }
    }
}

impl Settings {
    /// Load [`SETTINGS_FILE`] if present, otherwise defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(SETTINGS_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&text)?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
