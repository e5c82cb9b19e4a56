//! Application state and event loop for the sales report TUI.
//!
//! [`App`] owns the theme and the active tab and drives a synchronous
//! one-shot report loop: the pipeline has already run, so the loop only
//! redraws and handles navigation keys until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use report_core::formatting;
use report_data::aggregator::SalesAggregator;
use report_data::analysis::SalesReport;

use crate::chart_view;
use crate::table_view;
use crate::themes::Theme;

// ── ReportTab ─────────────────────────────────────────────────────────────────

/// Which aggregate view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTab {
    /// Chronological monthly table plus revenue chart.
    Months,
    /// Cities ranked by revenue.
    Cities,
    /// Order counts across the hours of the day.
    Hours,
    /// Products ranked by order count.
    Products,
    /// Top co-purchased product pairs.
    Pairs,
}

impl ReportTab {
    /// All tabs in display order.
    pub const ALL: [ReportTab; 5] = [
        ReportTab::Months,
        ReportTab::Cities,
        ReportTab::Hours,
        ReportTab::Products,
        ReportTab::Pairs,
    ];

    /// Construct a tab from its `--view` name.  Unknown names fall back
    /// to [`ReportTab::Months`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "cities" => ReportTab::Cities,
            "hours" => ReportTab::Hours,
            "products" => ReportTab::Products,
            "pairs" => ReportTab::Pairs,
            _ => ReportTab::Months,
        }
    }

    /// Tab-bar title.
    pub fn title(&self) -> &'static str {
        match self {
            ReportTab::Months => "Months",
            ReportTab::Cities => "Cities",
            ReportTab::Hours => "Hours",
            ReportTab::Products => "Products",
            ReportTab::Pairs => "Pairs",
        }
    }

    /// The tab to the right, wrapping around.
    pub fn next(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around.
    pub fn prev(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the sales report TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Currently displayed tab.
    pub tab: ReportTab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct a new application with the given configuration.
    pub fn new(theme_name: &str, tab: ReportTab) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab,
            should_quit: false,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the report view until the user quits with `q` / `Ctrl+C`.
    pub fn run(mut self, report: &SalesReport) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| self.render(frame, report))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    // ── Input handling ────────────────────────────────────────────────────────

    /// Apply a single key event to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = ReportTab::Months,
            KeyCode::Char('2') => self.tab = ReportTab::Cities,
            KeyCode::Char('3') => self.tab = ReportTab::Hours,
            KeyCode::Char('4') => self.tab = ReportTab::Products,
            KeyCode::Char('5') => self.tab = ReportTab::Pairs,
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame, report: &SalesReport) {
        let area = frame.area();

        if report.rows.is_empty() {
            table_view::render_no_data(frame, area, &self.theme);
            return;
        }

        let chunks =
            Layout::vertical([Constraint::Length(4), Constraint::Length(1), Constraint::Min(0)])
                .split(area);

        self.render_header(frame, chunks[0], report);
        self.render_tab_bar(frame, chunks[1]);
        self.render_body(frame, chunks[2], report);
    }

    /// Summary header: totals plus the headline "best" results.
    fn render_header(&self, frame: &mut Frame, area: Rect, report: &SalesReport) {
        let best_month = SalesAggregator::rank_by(report.monthly.clone(), |m| m.revenue, |m| m.month)
            .into_iter()
            .next();
        let best_city =
            SalesAggregator::rank_by(report.cities.clone(), |c| c.revenue, |c| c.city.clone())
                .into_iter()
                .next();

        let totals_line = Line::from(vec![
            Span::styled(
                formatting::format_number(report.rows.len() as f64, 0),
                self.theme.value,
            ),
            Span::styled(" line items   ", self.theme.label),
            Span::styled(formatting::format_currency(report.total_revenue), self.theme.value),
            Span::styled(" total revenue", self.theme.label),
        ]);

        let mut best_spans: Vec<Span> = Vec::new();
        if let Some(m) = best_month {
            best_spans.push(Span::styled("Best month: ", self.theme.label));
            best_spans.push(Span::styled(
                format!(
                    "{} ({})",
                    formatting::format_month(m.month),
                    formatting::format_currency(m.revenue)
                ),
                self.theme.success,
            ));
        }
        if let Some(c) = best_city {
            best_spans.push(Span::styled("   Best city: ", self.theme.label));
            best_spans.push(Span::styled(
                format!("{} ({})", c.city, formatting::format_currency(c.revenue)),
                self.theme.success,
            ));
        }

        let paragraph = Paragraph::new(vec![totals_line, Line::from(best_spans)]).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales Report ")
                .title_style(self.theme.header),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ReportTab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider(Span::styled("|", self.theme.separator));

        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect, report: &SalesReport) {
        match self.tab {
            ReportTab::Months => {
                let halves =
                    Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(area);
                table_view::render_months_table(frame, halves[0], &report.monthly, &self.theme);
                chart_view::render_monthly_revenue_chart(
                    frame,
                    halves[1],
                    &report.monthly,
                    &self.theme,
                );
            }
            ReportTab::Cities => {
                let ranked = SalesAggregator::rank_by(
                    report.cities.clone(),
                    |c| c.revenue,
                    |c| c.city.clone(),
                );
                table_view::render_cities_table(frame, area, &ranked, &self.theme);
            }
            ReportTab::Hours => {
                let split =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
                let busiest = SalesAggregator::rank_by(
                    report.hours.clone(),
                    |h| h.orders as f64,
                    |h| h.hour,
                )
                .into_iter()
                .next();
                let line = match busiest {
                    Some(h) => Line::from(vec![
                        Span::styled(" Busiest hour: ", self.theme.label),
                        Span::styled(
                            format!(
                                "{} ({} orders)",
                                formatting::format_hour(h.hour),
                                formatting::format_number(h.orders as f64, 0)
                            ),
                            self.theme.success,
                        ),
                    ]),
                    None => Line::from(Span::styled(" No purchases recorded", self.theme.dim)),
                };
                frame.render_widget(Paragraph::new(line), split[0]);
                chart_view::render_hourly_chart(frame, split[1], &report.hours, &self.theme);
            }
            ReportTab::Products => {
                let ranked = SalesAggregator::rank_by(
                    report.products.clone(),
                    |p| p.orders as f64,
                    |p| p.product.clone(),
                );
                table_view::render_products_table(frame, area, &ranked, &self.theme);
            }
            ReportTab::Pairs => {
                table_view::render_pairs_table(frame, area, &report.pairs, &self.theme);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
