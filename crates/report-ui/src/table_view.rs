//! Aggregate table views for the sales report TUI.
//!
//! Each view renders a bordered [`ratatui::widgets::Table`] with
//! alternating row styles; the chronological month view carries a
//! highlighted totals row at the bottom, and ranked views highlight
//! their top entry.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use report_core::formatting;
use report_data::aggregator::{CityStats, MonthlyStats, ProductStats};
use report_data::copurchase::PairCount;

use crate::themes::Theme;

// ── Month view ────────────────────────────────────────────────────────────────

/// Render the chronological monthly table with a totals row.
pub fn render_months_table(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlyStats],
    theme: &Theme,
) {
    let header = Row::new(
        ["Month", "Orders", "Revenue"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = months
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Row::new(vec![
                Cell::from(formatting::format_month(m.month)),
                Cell::from(formatting::format_number(m.orders as f64, 0)),
                Cell::from(formatting::format_currency(m.revenue)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let total_orders: u64 = months.iter().map(|m| m.orders).sum();
    let total_revenue: f64 = months.iter().map(|m| m.revenue).sum();
    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(formatting::format_number(total_orders as f64, 0)),
            Cell::from(formatting::format_currency(total_revenue)),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales by Month "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── City view ─────────────────────────────────────────────────────────────────

/// Render the revenue-ranked city table.  `cities` is expected to be
/// pre-ranked (revenue descending); the top row is highlighted.
pub fn render_cities_table(frame: &mut Frame, area: Rect, cities: &[CityStats], theme: &Theme) {
    let header = Row::new(
        ["#", "City", "Orders", "Revenue"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = cities
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(c.city.clone()),
                Cell::from(formatting::format_number(c.orders as f64, 0)),
                Cell::from(formatting::format_currency(c.revenue)),
            ])
            .style(theme.ranked_row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(22),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cities by Revenue "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Product view ──────────────────────────────────────────────────────────────

/// Render the order-count-ranked product table.  `products` is expected
/// to be pre-ranked (orders descending); the top row is highlighted.
pub fn render_products_table(
    frame: &mut Frame,
    area: Rect,
    products: &[ProductStats],
    theme: &Theme,
) {
    let header = Row::new(
        ["#", "Product", "Orders", "Avg Unit Price"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.product.clone()),
                Cell::from(formatting::format_number(p.orders as f64, 0)),
                Cell::from(formatting::format_currency(p.mean_unit_price)),
            ])
            .style(theme.ranked_row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(30),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Products by Orders "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Pair view ─────────────────────────────────────────────────────────────────

/// Render the top co-purchased product pairs.
pub fn render_pairs_table(frame: &mut Frame, area: Rect, pairs: &[PairCount], theme: &Theme) {
    let header = Row::new(
        ["#", "Bought Together", "Orders"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = pairs
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.label()),
                Cell::from(formatting::format_number(p.count as f64, 0)),
            ])
            .style(theme.ranked_row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(52),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Frequently Bought Together "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── No data ───────────────────────────────────────────────────────────────────

/// Render a "no data" placeholder when no valid rows survived cleaning.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales data found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the data directory contains monthly CSV files.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales Report "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_months() -> Vec<MonthlyStats> {
        vec![
            MonthlyStats {
                month: NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
                orders: 24_004,
                revenue: 4_613_443.34,
            },
            MonthlyStats {
                month: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                orders: 336,
                revenue: 8_670.29,
            },
        ]
    }

    fn make_cities() -> Vec<CityStats> {
        vec![
            CityStats {
                city: "San Francisco, CA".to_string(),
                orders: 44_732,
                revenue: 8_262_203.91,
            },
            CityStats {
                city: "Portland, ME".to_string(),
                orders: 2_750,
                revenue: 449_758.27,
            },
        ]
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_months_table_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let months = make_months();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_months_table(frame, area, &months, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_months_table_empty_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_months_table(frame, area, &[], &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_cities_table_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let cities = make_cities();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_cities_table(frame, area, &cities, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_products_table_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let products = vec![ProductStats {
            product: "USB-C Charging Cable".to_string(),
            orders: 21_903,
            mean_unit_price: 11.95,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_products_table(frame, area, &products, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_pairs_table_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let pairs = vec![PairCount {
            first: "Lightning Charging Cable".to_string(),
            second: "iPhone".to_string(),
            count: 1_005,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_pairs_table(frame, area, &pairs, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();
    }
}
