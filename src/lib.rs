//! COVID Explorer - WHO daily data cleaning, charts & dashboard
//!
//! Loads the WHO daily case/death file, normalizes it into a canonical table
//! and derives a country series, a latest snapshot ranking, a correlation
//! matrix and a world map from it.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stats;
