//! Derivation of typed sale rows from raw CSV records.
//!
//! Everything here is total: a record that survived the cleaner but still
//! fails to parse is a data-integrity error and aborts the run, rather
//! than being skipped and silently corrupting the aggregates.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{ReportError, Result};
use crate::models::{RawRecord, SaleRow};

/// Timestamp formats accepted for the `order_timestamp` field, tried in
/// order.  Two-digit years dominate the data; four-digit years appear in
/// a handful of re-exported files.
const TIMESTAMP_FORMATS: &[&str] = &["%m/%d/%y %H:%M", "%m/%d/%Y %H:%M"];

// ── FieldDeriver ──────────────────────────────────────────────────────────────

/// Stateless helper that computes all derived fields for a raw record.
pub struct FieldDeriver;

impl FieldDeriver {
    /// Derive a fully-typed [`SaleRow`] from a cleaned [`RawRecord`].
    ///
    /// Fails with a diagnostic naming the offending value when any field
    /// does not conform to the expected shape.
    pub fn derive(record: &RawRecord) -> Result<SaleRow> {
        let quantity: u32 = record
            .quantity
            .trim()
            .parse()
            .map_err(|_| ReportError::QuantityParse(record.quantity.clone()))?;

        let unit_price: f64 = record
            .unit_price
            .trim()
            .parse()
            .map_err(|_| ReportError::PriceParse(record.unit_price.clone()))?;
        if unit_price < 0.0 || !unit_price.is_finite() {
            return Err(ReportError::PriceParse(record.unit_price.clone()));
        }

        let timestamp = Self::parse_timestamp(&record.order_timestamp)?;
        let city = Self::extract_city(&record.address)?;

        Ok(SaleRow {
            order_id: record.order_id.clone(),
            product: record.product.clone(),
            quantity,
            unit_price,
            timestamp,
            order_month: Self::month_of(&timestamp),
            total_earnings: Self::round_cents(f64::from(quantity) * unit_price),
            city,
            purchase_hour: timestamp.hour(),
        })
    }

    /// Parse an order timestamp string against the accepted formats.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
        let trimmed = s.trim();
        for fmt in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(ts);
            }
        }
        Err(ReportError::TimestampParse(s.to_string()))
    }

    /// The first day of the timestamp's calendar month.
    ///
    /// Grouping and sorting on this date keeps "12/19" ahead of "1/20",
    /// which lexical month strings would reverse.
    pub fn month_of(timestamp: &NaiveDateTime) -> NaiveDate {
        // Day 1 exists in every month chrono can parse.
        timestamp
            .date()
            .with_day(1)
            .unwrap_or_else(|| timestamp.date())
    }

    /// Extract the "City, ST" grouping key from a purchase address.
    ///
    /// The address shape is "street, city, state zip, country"; the state
    /// code is the first two characters of the third segment.  City names
    /// are not unique across states (Portland OR vs Portland ME), so the
    /// code is part of the key.
    pub fn extract_city(address: &str) -> Result<String> {
        let segments: Vec<&str> = address.split(", ").collect();
        if segments.len() < 3 {
            return Err(ReportError::AddressParse(address.to_string()));
        }

        let city = segments[1].trim();
        let state_code = segments[2]
            .trim()
            .get(..2)
            .ok_or_else(|| ReportError::AddressParse(address.to_string()))?;
        if city.is_empty() || state_code.len() < 2 {
            return Err(ReportError::AddressParse(address.to_string()));
        }

        Ok(format!("{}, {}", city, state_code))
    }

    /// Round a dollar amount to cents, half away from zero.
    ///
    /// A half-ULP nudge keeps binary midpoints like `2.675` from rounding
    /// down when the IEEE 754 representation lands just under `.5`.
    pub fn round_cents(value: f64) -> f64 {
        let scaled = value * 100.0;
        let epsilon = f64::EPSILON * scaled.abs();
        if scaled < 0.0 {
            (scaled - epsilon).round() / 100.0
        } else {
            (scaled + epsilon).round() / 100.0
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
