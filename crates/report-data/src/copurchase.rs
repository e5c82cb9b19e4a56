//! Co-purchase analysis: products frequently bought in the same order.
//!
//! An order appears in the table as several rows sharing one order id.
//! Orders with at least two line items contribute every unordered
//! 2-combination of their line items' product names.  Duplicate line
//! items are deliberately kept in the combination input, matching the
//! raw line counting used everywhere else, so an order [X, X, Y] yields
//! (X, X) once and (X, Y) twice.

use std::collections::HashMap;

use report_core::models::SaleRow;
use tracing::debug;

// ── PairCount ─────────────────────────────────────────────────────────────────

/// An unordered product pair and the number of times it was co-purchased.
///
/// `first` and `second` are lexically ordered so the pair identity is
/// canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCount {
    pub first: String,
    pub second: String,
    pub count: u64,
}

impl PairCount {
    /// Display label: `"iPhone + Lightning Charging Cable"`.
    pub fn label(&self) -> String {
        format!("{} + {}", self.first, self.second)
    }
}

// ── CoPurchaseAnalyzer ────────────────────────────────────────────────────────

/// Stateless helper that counts co-purchased product pairs.
pub struct CoPurchaseAnalyzer;

impl CoPurchaseAnalyzer {
    /// Count every unordered product pair across all multi-item orders.
    ///
    /// Keys are `(first, second)` with `first <= second` lexically.
    pub fn count_pairs(rows: &[SaleRow]) -> HashMap<(String, String), u64> {
        // Rebuild orders from repeated order ids, keeping duplicate line
        // items.
        let mut orders: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in rows {
            orders
                .entry(row.order_id.as_str())
                .or_default()
                .push(row.product.as_str());
        }

        let multi_item = orders.values().filter(|p| p.len() > 1).count();
        debug!(
            "Co-purchase input: {} orders, {} with more than one line item",
            orders.len(),
            multi_item
        );

        let mut counts: HashMap<(String, String), u64> = HashMap::new();
        for products in orders.values() {
            if products.len() < 2 {
                continue;
            }
            // Order sizes are small, so the quadratic combination scan
            // stays cheap.
            for i in 0..products.len() {
                for j in (i + 1)..products.len() {
                    let (a, b) = if products[i] <= products[j] {
                        (products[i], products[j])
                    } else {
                        (products[j], products[i])
                    };
                    *counts.entry((a.to_string(), b.to_string())).or_insert(0) += 1;
                }
            }
        }

        counts
    }

    /// The `k` most frequently co-purchased pairs, most frequent first.
    ///
    /// Ties are broken by lexical order of the canonical pair so the
    /// output is reproducible run to run.
    pub fn top_pairs(rows: &[SaleRow], k: usize) -> Vec<PairCount> {
        let mut pairs: Vec<PairCount> = Self::count_pairs(rows)
            .into_iter()
            .map(|((first, second), count)| PairCount {
                first,
                second,
                count,
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.count.cmp(&a.count).then_with(|| {
                (a.first.as_str(), a.second.as_str()).cmp(&(b.first.as_str(), b.second.as_str()))
            })
        });
        pairs.truncate(k);
        pairs
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
