//! Terminal UI layer for the sales report.
//!
//! Provides themes, aggregate table views, bar-chart views for the
//! chronological series, and the tabbed application event loop built on
//! top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod table_view;
pub mod themes;

pub use report_core as core;
