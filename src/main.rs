//! Batch report: load, normalize, aggregate and write the four charts.

use anyhow::{Context, Result};
use covid_explorer::charts::StaticChartRenderer;
use covid_explorer::config::{Settings, DATA_FILE};
use covid_explorer::data::ColumnMapping;
use covid_explorer::{logging, pipeline, report};
use tracing::info;

fn main() -> Result<()> {
    logging::init();

    let settings = Settings::load().context("Failed to load settings")?;

    // Missing columns abort here, before any chart work
    let table = pipeline::load_table(DATA_FILE, &ColumnMapping::batch())
        .with_context(|| format!("Failed to prepare {DATA_FILE}"))?;

    let items = report::batch_report(&table, &settings);
    let mut renderer = StaticChartRenderer::new(&settings);
    let rendered = report::present(&items, &mut renderer)?;

    info!(
        charts = rendered,
        output = %settings.output_dir.display(),
        "report complete"
    );
    Ok(())
}
