//! Interactive dashboard: single country and latest snapshot views.

use covid_explorer::config::{Settings, DATA_FILE};
use covid_explorer::gui::DashboardApp;
use covid_explorer::logging;
use eframe::egui;
use std::path::PathBuf;
use tracing::warn;

fn main() -> eframe::Result<()> {
    logging::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("{}, using default settings", e);
        Settings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("COVID-19 Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Dashboard",
        options,
        Box::new(|cc| {
            Ok(Box::new(DashboardApp::new(
                cc,
                PathBuf::from(DATA_FILE),
                settings,
            )))
        }),
    )
}
