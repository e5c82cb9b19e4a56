//! CSV file discovery and consolidated loading for the sales report.
//!
//! Reads every monthly transaction file under the data directory and
//! concatenates their rows, in file order, into one in-memory table.
//! Malformed rows (embedded duplicate headers, rows with empty fields)
//! are preserved here on purpose; the cleaner is a separate stage.

use std::path::{Path, PathBuf};

use report_core::error::{ReportError, Result};
use report_core::models::RawRecord;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every monthly file under `data_path` into one consolidated table.
///
/// Returns `(records, file_count)` with rows in concatenation order.  Any
/// file that cannot be opened or parsed aborts the whole load – there is
/// no partial-load mode, so downstream aggregates can never be computed
/// from an incomplete month set.  A directory with no CSV files yields an
/// empty table plus a warning.
pub fn load_raw_records(data_path: &Path) -> Result<(Vec<RawRecord>, usize)> {
    if !data_path.exists() {
        return Err(ReportError::DataPathNotFound(data_path.to_path_buf()));
    }

    let csv_files = find_csv_files(data_path);
    if csv_files.is_empty() {
        warn!("No CSV files found in {}", data_path.display());
        return Ok((Vec::new(), 0));
    }

    let mut all_records: Vec<RawRecord> = Vec::new();
    for file_path in &csv_files {
        let records = read_single_file(file_path)?;
        debug!("File {}: {} rows", file_path.display(), records.len());
        all_records.extend(records);
    }

    debug!(
        "Loaded {} rows from {} files",
        all_records.len(),
        csv_files.len()
    );

    Ok((all_records, csv_files.len()))
}

/// Write the consolidated pre-cleaning table to `path`.
///
/// This is the audit export: the union of all valid and invalid rows in
/// concatenation order, under the same header schema as the inputs.
pub fn write_consolidated(records: &[RawRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read one monthly file into raw records.  Field values are trimmed; the
/// header row is consumed by the reader, so embedded duplicate headers
/// deeper in the file come through as ordinary (malformed) rows.
fn read_single_file(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records: Vec<RawRecord> = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
