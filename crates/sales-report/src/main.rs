mod bootstrap;

use anyhow::{Context, Result};
use report_core::settings::Settings;
use report_data::analysis::analyze_sales;
use report_ui::app::{App, ReportTab};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sales Report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let data_path = match settings.data_dir.clone() {
        Some(path) => path,
        None => bootstrap::discover_data_path()
            .context("no sales data directory found; pass --data-dir")?,
    };
    tracing::info!("Loading sales data from {}", data_path.display());

    let export_path = if settings.no_export {
        None
    } else {
        Some(settings.export_file.clone())
    };

    // Run the full pipeline: load → export → clean → derive → aggregate.
    let report = analyze_sales(
        &data_path,
        export_path.as_deref(),
        settings.top_pairs as usize,
    )?;

    tracing::info!(
        "Loaded {} rows ({} dropped by cleaning) across {} months",
        report.rows.len(),
        report.metadata.header_artifacts_removed + report.metadata.incomplete_rows_removed,
        report.monthly.len()
    );

    let app = App::new(&settings.theme, ReportTab::from_name(&settings.view));
    app.run(&report)?;

    Ok(())
}
