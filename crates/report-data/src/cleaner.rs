//! Removal of malformed rows from the consolidated table.
//!
//! Two corruption classes exist in the source data: embedded duplicate
//! header rows (an artifact of the files being naive concatenations
//! themselves) and rows with empty fields.  Both are expected and are
//! filtered silently; anything else that fails to parse is caught later
//! by the field deriver, which errors instead of skipping.

use report_core::models::{RawRecord, COLUMNS};
use tracing::debug;

// ── Predicates ────────────────────────────────────────────────────────────────

/// Returns `true` when the row is a duplicate of the column header:
/// every field equals its own column name.
pub fn is_header_artifact(record: &RawRecord) -> bool {
    record.order_id == COLUMNS[0]
        && record.product == COLUMNS[1]
        && record.quantity == COLUMNS[2]
        && record.unit_price == COLUMNS[3]
        && record.order_timestamp == COLUMNS[4]
        && record.address == COLUMNS[5]
}

/// Returns `true` when any field of the row is empty after trimming.
pub fn is_incomplete(record: &RawRecord) -> bool {
    record.order_id.trim().is_empty()
        || record.product.trim().is_empty()
        || record.quantity.trim().is_empty()
        || record.unit_price.trim().is_empty()
        || record.order_timestamp.trim().is_empty()
        || record.address.trim().is_empty()
}

// ── CleanSummary ──────────────────────────────────────────────────────────────

/// Row counts recorded by a cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Rows that survived cleaning.
    pub kept: usize,
    /// Duplicate-header rows removed.
    pub header_artifacts: usize,
    /// Rows removed for having one or more empty fields.
    pub incomplete: usize,
}

// ── clean ─────────────────────────────────────────────────────────────────────

/// Drop malformed rows from the consolidated table, preserving order.
///
/// Returns the well-formed rows plus a [`CleanSummary`] of what was
/// removed.  A table whose rows are all malformed cleans to an empty
/// table; that is not an error.
pub fn clean(records: Vec<RawRecord>) -> (Vec<RawRecord>, CleanSummary) {
    let mut summary = CleanSummary::default();

    let kept: Vec<RawRecord> = records
        .into_iter()
        .filter(|record| {
            if is_header_artifact(record) {
                summary.header_artifacts += 1;
                return false;
            }
            if is_incomplete(record) {
                summary.incomplete += 1;
                return false;
            }
            true
        })
        .collect();

    summary.kept = kept.len();
    debug!(
        "Cleaned table: {} kept, {} header artifacts, {} incomplete",
        summary.kept, summary.header_artifacts, summary.incomplete
    );

    (kept, summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
