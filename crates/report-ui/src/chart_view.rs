//! Bar-chart views for the chronological series.
//!
//! Months and hours are charted in natural order regardless of
//! magnitude; rankings belong to the table views.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use report_core::formatting;
use report_data::aggregator::{HourlyStats, MonthlyStats};

use crate::themes::Theme;

/// Render revenue per month as a bar chart, chronological order.
pub fn render_monthly_revenue_chart(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlyStats],
    theme: &Theme,
) {
    let bars: Vec<Bar> = months
        .iter()
        .map(|m| {
            Bar::default()
                .value(m.revenue.round().max(0.0) as u64)
                .text_value(formatting::format_compact(m.revenue))
                .label(Line::styled(
                    formatting::format_month_short(m.month),
                    theme.chart_label,
                ))
                .style(theme.chart_bar)
                .value_style(theme.chart_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly Revenue (USD) "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1)
        .style(theme.text);

    frame.render_widget(chart, area);
}

/// Render order counts per hour of day, hours 00–23 in natural order.
///
/// Hours with no orders still get a (zero-height) bar so the time axis
/// stays continuous.
pub fn render_hourly_chart(frame: &mut Frame, area: Rect, hours: &[HourlyStats], theme: &Theme) {
    let mut counts = [0u64; 24];
    for stat in hours {
        if let Some(slot) = counts.get_mut(stat.hour as usize) {
            *slot = stat.orders;
        }
    }

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(hour, &orders)| {
            Bar::default()
                .value(orders)
                .text_value(formatting::format_compact(orders as f64))
                .label(Line::styled(format!("{:02}", hour), theme.chart_label))
                .style(theme.chart_bar)
                .value_style(theme.chart_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Orders by Hour of Day "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .style(theme.text);

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
