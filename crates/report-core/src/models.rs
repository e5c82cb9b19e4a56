use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The fixed header schema shared by every monthly input file, in column
/// order.  The consolidated export uses the same schema.
pub const COLUMNS: [&str; 6] = [
    "order_id",
    "product",
    "quantity",
    "unit_price",
    "order_timestamp",
    "address",
];

/// A single line item exactly as read from a monthly CSV file.
///
/// Every field is kept as a string so that malformed rows (embedded
/// duplicate-header artifacts, rows with empty fields) survive loading
/// unchanged; cleaning and typing happen in later pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Order identifier; repeated across rows of a multi-item order.
    pub order_id: String,
    /// Product name.
    pub product: String,
    /// Quantity ordered, expected to parse as a non-negative integer.
    pub quantity: String,
    /// Price per unit, expected to parse as a non-negative decimal.
    pub unit_price: String,
    /// Order timestamp string in "MM/DD/YY HH:MM" form.
    pub order_timestamp: String,
    /// Purchase address in "street, city, state zip, country" form.
    pub address: String,
}

/// A fully-typed sale row with all derived fields computed.
///
/// Produced by `FieldDeriver::derive` from a cleaned [`RawRecord`]; every
/// aggregation downstream reads from this type only.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRow {
    /// Order identifier.
    pub order_id: String,
    /// Product name.
    pub product: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Price per unit in USD.
    pub unit_price: f64,
    /// Parsed order timestamp (naive local time).
    pub timestamp: NaiveDateTime,
    /// First day of the order's calendar month.  Date-typed so that
    /// chronological sorting never degrades to lexical string order.
    pub order_month: NaiveDate,
    /// quantity × unit_price, rounded to cents.
    pub total_earnings: f64,
    /// "City, ST" key; the state code disambiguates same-named cities.
    pub city: String,
    /// Hour of purchase, 0–23.
    pub purchase_hour: u32,
}
