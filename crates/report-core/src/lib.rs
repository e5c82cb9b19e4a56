//! Core domain layer for the sales report.
//!
//! Defines the raw and derived record models, field derivation, the shared
//! error type, CLI settings with last-used persistence, and the number
//! formatting helpers used by the reporting layer.

pub mod error;
pub mod fields;
pub mod formatting;
pub mod models;
pub mod settings;
