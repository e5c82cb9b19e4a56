use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A source file could not be opened or read from disk.  Loading is
    /// all-or-nothing, so this aborts the run.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed or written.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// An order timestamp did not match any recognised format.
    #[error("Invalid order timestamp: {0}")]
    TimestampParse(String),

    /// A purchase address did not have the expected
    /// "street, city, state zip, country" shape.
    #[error("Malformed purchase address: {0}")]
    AddressParse(String),

    /// A quantity field was not a non-negative integer.
    #[error("Invalid quantity: {0}")]
    QuantityParse(String),

    /// A unit-price field was not a non-negative decimal.
    #[error("Invalid unit price: {0}")]
    PriceParse(String),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV input files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
