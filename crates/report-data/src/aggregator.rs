//! Grouping and reduction over the derived sales table.
//!
//! All aggregation goes through one `BTreeMap`-backed driver, so every
//! series comes back with unique keys in ascending key order (calendar
//! order for months, lexical for cities and products, numeric for
//! hours).  Rankings are produced separately by [`SalesAggregator::rank_by`],
//! which sorts by reduction value descending with an ascending-key
//! tie-break for deterministic output.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use report_core::models::SaleRow;

// ── GroupStats ────────────────────────────────────────────────────────────────

/// Reductions accumulated for one grouping key.
#[derive(Debug, Clone, Default)]
struct GroupStats {
    orders: u64,
    revenue: f64,
    unit_price_total: f64,
}

impl GroupStats {
    /// Add a single row's contribution to the running totals.
    fn add_row(&mut self, row: &SaleRow) {
        self.orders += 1;
        self.revenue += row.total_earnings;
        self.unit_price_total += row.unit_price;
    }

    /// Mean unit price across the group's rows.
    fn mean_unit_price(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.unit_price_total / self.orders as f64
        }
    }
}

// ── Aggregate rows ────────────────────────────────────────────────────────────

/// Order count and revenue for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    /// First day of the month.
    pub month: NaiveDate,
    pub orders: u64,
    pub revenue: f64,
}

/// Order count and revenue for one "City, ST" key.
#[derive(Debug, Clone, PartialEq)]
pub struct CityStats {
    pub city: String,
    pub orders: u64,
    pub revenue: f64,
}

/// Order count for one hour of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyStats {
    /// Hour 0–23.
    pub hour: u32,
    pub orders: u64,
}

/// Order count and mean unit price for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub product: String,
    pub orders: u64,
    pub mean_unit_price: f64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups derived sale rows by various keys.
///
/// Aggregation never mutates its input; running any instance twice over
/// the same table yields identical mappings.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Order count and revenue per calendar month, chronological order.
    pub fn aggregate_monthly(rows: &[SaleRow]) -> Vec<MonthlyStats> {
        Self::aggregate_by_key(rows, |row| row.order_month)
            .into_iter()
            .map(|(month, stats)| MonthlyStats {
                month,
                orders: stats.orders,
                revenue: stats.revenue,
            })
            .collect()
    }

    /// Order count and revenue per city, ascending city-key order.
    pub fn aggregate_by_city(rows: &[SaleRow]) -> Vec<CityStats> {
        Self::aggregate_by_key(rows, |row| row.city.clone())
            .into_iter()
            .map(|(city, stats)| CityStats {
                city,
                orders: stats.orders,
                revenue: stats.revenue,
            })
            .collect()
    }

    /// Order count per purchase hour, ascending hour order.
    pub fn aggregate_hourly(rows: &[SaleRow]) -> Vec<HourlyStats> {
        Self::aggregate_by_key(rows, |row| row.purchase_hour)
            .into_iter()
            .map(|(hour, stats)| HourlyStats {
                hour,
                orders: stats.orders,
            })
            .collect()
    }

    /// Order count and mean unit price per product, ascending name order.
    pub fn aggregate_by_product(rows: &[SaleRow]) -> Vec<ProductStats> {
        Self::aggregate_by_key(rows, |row| row.product.clone())
            .into_iter()
            .map(|(product, stats)| ProductStats {
                product,
                orders: stats.orders,
                mean_unit_price: stats.mean_unit_price(),
            })
            .collect()
    }

    /// Sum of `total_earnings` across the whole table.
    pub fn total_revenue(rows: &[SaleRow]) -> f64 {
        rows.iter().map(|row| row.total_earnings).sum()
    }

    /// Sort aggregate rows by reduction value descending; ties broken by
    /// ascending grouping key so that equal values report in a stable,
    /// reproducible order.
    pub fn rank_by<T, K: Ord>(
        mut items: Vec<T>,
        value: impl Fn(&T) -> f64,
        key: impl Fn(&T) -> K,
    ) -> Vec<T> {
        items.sort_by(|a, b| {
            value(b)
                .partial_cmp(&value(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| key(a).cmp(&key(b)))
        });
        items
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic aggregation driver.
    ///
    /// `key_fn` maps a row to its grouping key; the BTreeMap keeps keys
    /// unique and ascending.
    fn aggregate_by_key<K: Ord>(
        rows: &[SaleRow],
        key_fn: impl Fn(&SaleRow) -> K,
    ) -> BTreeMap<K, GroupStats> {
        let mut map: BTreeMap<K, GroupStats> = BTreeMap::new();
        for row in rows {
            map.entry(key_fn(row)).or_default().add_row(row);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::fields::FieldDeriver;
    use report_core::models::RawRecord;

    fn make_row(
        order_id: &str,
        product: &str,
        quantity: &str,
        unit_price: &str,
        timestamp: &str,
        address: &str,
    ) -> SaleRow {
        FieldDeriver::derive(&RawRecord {
            order_id: order_id.to_string(),
            product: product.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
            order_timestamp: timestamp.to_string(),
            address: address.to_string(),
        })
        .unwrap()
    }

    fn sample_rows() -> Vec<SaleRow> {
        vec![
            make_row("1", "AA Batteries (4-pack)", "2", "3.84", "12/15/19 09:10",
                     "1 Elm St, Boston, MA 02215, USA"),
            make_row("2", "iPhone", "1", "700", "12/28/19 19:45",
                     "2 Oak St, Boston, MA 02215, USA"),
            make_row("3", "iPhone", "1", "700", "01/20/20 19:03",
                     "3 Pine St, Seattle, WA 98101, USA"),
        ]
    }

    // ── aggregate_monthly ─────────────────────────────────────────────────────

    #[test]
    fn test_monthly_groups_by_calendar_month() {
        let periods = SalesAggregator::aggregate_monthly(&sample_rows());

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].month, NaiveDate::from_ymd_opt(2019, 12, 1).unwrap());
        assert_eq!(periods[0].orders, 2);
        assert_eq!(periods[1].month, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(periods[1].orders, 1);
    }

    #[test]
    fn test_monthly_sorted_chronologically_not_lexically() {
        // "12/19" must come before "01/20" even though the string order
        // is reversed.
        let periods = SalesAggregator::aggregate_monthly(&sample_rows());
        assert!(periods[0].month < periods[1].month);
        assert_eq!(periods[0].month.format("%m/%y").to_string(), "12/19");
        assert_eq!(periods[1].month.format("%m/%y").to_string(), "01/20");
    }

    #[test]
    fn test_monthly_revenue_sums_earnings() {
        let periods = SalesAggregator::aggregate_monthly(&sample_rows());
        // December: 2 × 3.84 + 700 = 707.68
        assert!((periods[0].revenue - 707.68).abs() < 1e-9);
        assert!((periods[1].revenue - 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_empty_input() {
        assert!(SalesAggregator::aggregate_monthly(&[]).is_empty());
    }

    // ── aggregate_by_city ─────────────────────────────────────────────────────

    #[test]
    fn test_city_groups_and_sums() {
        let cities = SalesAggregator::aggregate_by_city(&sample_rows());

        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].city, "Boston, MA");
        assert_eq!(cities[0].orders, 2);
        assert!((cities[0].revenue - 707.68).abs() < 1e-9);
        assert_eq!(cities[1].city, "Seattle, WA");
    }

    #[test]
    fn test_city_same_name_different_state_counted_separately() {
        let rows = vec![
            make_row("1", "iPhone", "1", "700", "04/19/19 08:46",
                     "123 A St, Portland, OR 97035, USA"),
            make_row("2", "iPhone", "1", "700", "04/19/19 09:46",
                     "456 B St, Portland, ME 04101, USA"),
        ];

        let cities = SalesAggregator::aggregate_by_city(&rows);
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].city, "Portland, ME");
        assert_eq!(cities[1].city, "Portland, OR");
        assert_eq!(cities[0].orders, 1);
        assert_eq!(cities[1].orders, 1);
    }

    // ── aggregate_hourly ──────────────────────────────────────────────────────

    #[test]
    fn test_hourly_groups_by_hour() {
        let hours = SalesAggregator::aggregate_hourly(&sample_rows());

        // 09:10, 19:45, 19:03 → hour 9 once, hour 19 twice.
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].hour, 9);
        assert_eq!(hours[0].orders, 1);
        assert_eq!(hours[1].hour, 19);
        assert_eq!(hours[1].orders, 2);
    }

    // ── aggregate_by_product ──────────────────────────────────────────────────

    #[test]
    fn test_product_counts_and_mean_price() {
        let products = SalesAggregator::aggregate_by_product(&sample_rows());

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product, "AA Batteries (4-pack)");
        assert_eq!(products[0].orders, 1);
        assert!((products[0].mean_unit_price - 3.84).abs() < 1e-9);
        assert_eq!(products[1].product, "iPhone");
        assert_eq!(products[1].orders, 2);
        assert!((products[1].mean_unit_price - 700.0).abs() < 1e-9);
    }

    // ── total_revenue ─────────────────────────────────────────────────────────

    #[test]
    fn test_total_revenue_sums_all_rows() {
        let total = SalesAggregator::total_revenue(&sample_rows());
        assert!((total - 1407.68).abs() < 1e-9);
    }

    #[test]
    fn test_total_revenue_empty() {
        assert_eq!(SalesAggregator::total_revenue(&[]), 0.0);
    }

    // ── rank_by ───────────────────────────────────────────────────────────────

    #[test]
    fn test_rank_by_value_descending() {
        let cities = SalesAggregator::aggregate_by_city(&sample_rows());
        let ranked = SalesAggregator::rank_by(cities, |c| c.revenue, |c| c.city.clone());

        assert_eq!(ranked[0].city, "Boston, MA");
        assert_eq!(ranked[1].city, "Seattle, WA");
    }

    #[test]
    fn test_rank_by_ties_broken_by_ascending_key() {
        let rows = vec![
            make_row("1", "iPhone", "1", "700", "04/19/19 08:46",
                     "1 A St, Seattle, WA 98101, USA"),
            make_row("2", "iPhone", "1", "700", "04/19/19 09:46",
                     "2 B St, Atlanta, GA 30301, USA"),
        ];
        let cities = SalesAggregator::aggregate_by_city(&rows);
        let ranked = SalesAggregator::rank_by(cities, |c| c.revenue, |c| c.city.clone());

        // Equal revenue → lexical city order.
        assert_eq!(ranked[0].city, "Atlanta, GA");
        assert_eq!(ranked[1].city, "Seattle, WA");
    }

    #[test]
    fn test_rank_by_months_ties_broken_chronologically() {
        let rows = vec![
            make_row("1", "iPhone", "1", "700", "12/15/19 09:10",
                     "1 Elm St, Boston, MA 02215, USA"),
            make_row("2", "iPhone", "1", "700", "01/20/20 19:03",
                     "2 Oak St, Boston, MA 02215, USA"),
        ];
        let monthly = SalesAggregator::aggregate_monthly(&rows);
        let ranked = SalesAggregator::rank_by(monthly, |m| m.revenue, |m| m.month);

        assert_eq!(ranked[0].month, NaiveDate::from_ymd_opt(2019, 12, 1).unwrap());
    }

    // ── idempotence ───────────────────────────────────────────────────────────

    #[test]
    fn test_aggregation_does_not_mutate_input() {
        let rows = sample_rows();
        let before = rows.clone();

        let first = SalesAggregator::aggregate_monthly(&rows);
        let second = SalesAggregator::aggregate_monthly(&rows);

        assert_eq!(rows, before);
        assert_eq!(first, second);
    }
}
