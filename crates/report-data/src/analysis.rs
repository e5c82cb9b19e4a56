//! Main analysis pipeline for the sales report.
//!
//! Orchestrates loading, the consolidated export, cleaning, field
//! derivation and all aggregate reductions, returning a [`SalesReport`]
//! ready for the UI layer.  The whole pipeline is synchronous and
//! single-pass; the only I/O is the initial file reads and the export.

use std::path::Path;

use report_core::error::Result;
use report_core::fields::FieldDeriver;
use report_core::models::SaleRow;
use tracing::info;

use crate::aggregator::{
    CityStats, HourlyStats, MonthlyStats, ProductStats, SalesAggregator,
};
use crate::cleaner::clean;
use crate::copurchase::{CoPurchaseAnalyzer, PairCount};
use crate::reader::{load_raw_records, write_consolidated};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Number of source CSV files loaded.
    pub files_loaded: usize,
    /// Total rows read across all files, before cleaning.
    pub rows_loaded: usize,
    /// Duplicate-header rows removed by the cleaner.
    pub header_artifacts_removed: usize,
    /// Rows removed by the cleaner for empty fields.
    pub incomplete_rows_removed: usize,
    /// Wall-clock seconds spent reading the CSV files.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent deriving typed rows.
    pub derive_time_seconds: f64,
}

/// The complete output of [`analyze_sales`].
#[derive(Debug, Clone)]
pub struct SalesReport {
    /// Cleaned, fully-derived rows in concatenation order.
    pub rows: Vec<SaleRow>,
    /// Orders and revenue per month, chronological.
    pub monthly: Vec<MonthlyStats>,
    /// Orders and revenue per city, ascending city key.
    pub cities: Vec<CityStats>,
    /// Orders per purchase hour, ascending hour.
    pub hours: Vec<HourlyStats>,
    /// Orders and mean unit price per product, ascending name.
    pub products: Vec<ProductStats>,
    /// Top-K co-purchased product pairs, most frequent first.
    pub pairs: Vec<PairCount>,
    /// Sum of earnings across all rows.
    pub total_revenue: f64,
    /// Metadata about this run.
    pub metadata: ReportMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Load and concatenate every CSV file under `data_path`.
/// 2. Write the consolidated pre-cleaning export (when requested).
/// 3. Drop header-artifact and incomplete rows.
/// 4. Derive typed rows; any surviving malformed row is a fatal
///    data-integrity error rather than a silent skip.
/// 5. Compute the monthly / city / hourly / product aggregates.
/// 6. Count co-purchased pairs and keep the top `top_pairs`.
pub fn analyze_sales(
    data_path: &Path,
    export_path: Option<&Path>,
    top_pairs: usize,
) -> Result<SalesReport> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let (raw_records, files_loaded) = load_raw_records(data_path)?;
    let load_time = load_start.elapsed().as_secs_f64();
    let rows_loaded = raw_records.len();

    // ── Step 2: Consolidated export ───────────────────────────────────────────
    if let Some(path) = export_path {
        write_consolidated(&raw_records, path)?;
        info!("Wrote consolidated export: {}", path.display());
    }

    // ── Step 3: Clean ─────────────────────────────────────────────────────────
    let (kept, summary) = clean(raw_records);

    // ── Step 4: Derive ────────────────────────────────────────────────────────
    let derive_start = std::time::Instant::now();
    let rows: Vec<SaleRow> = kept
        .iter()
        .map(FieldDeriver::derive)
        .collect::<Result<_>>()?;
    let derive_time = derive_start.elapsed().as_secs_f64();

    // ── Step 5: Aggregate ─────────────────────────────────────────────────────
    let monthly = SalesAggregator::aggregate_monthly(&rows);
    let cities = SalesAggregator::aggregate_by_city(&rows);
    let hours = SalesAggregator::aggregate_hourly(&rows);
    let products = SalesAggregator::aggregate_by_product(&rows);
    let total_revenue = SalesAggregator::total_revenue(&rows);

    // ── Step 6: Co-purchase pairs ─────────────────────────────────────────────
    let pairs = CoPurchaseAnalyzer::top_pairs(&rows, top_pairs);

    info!(
        "Analyzed {} rows: {} months, {} cities, {} products",
        rows.len(),
        monthly.len(),
        cities.len(),
        products.len()
    );

    let metadata = ReportMetadata {
        generated_at: chrono::Utc::now().to_rfc3339(),
        files_loaded,
        rows_loaded,
        header_artifacts_removed: summary.header_artifacts,
        incomplete_rows_removed: summary.incomplete,
        load_time_seconds: load_time,
        derive_time_seconds: derive_time,
    };

    Ok(SalesReport {
        rows,
        monthly,
        cities,
        hours,
        products,
        pairs,
        total_revenue,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
