use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.sales-report/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.sales-report/`
/// - `~/.sales-report/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let report_dir = home.join(".sales-report");
    std::fs::create_dir_all(&report_dir)?;
    std::fs::create_dir_all(report_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // Map the upper-case CLI level names to tracing directives (lowercase).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Attempt to locate the sales data directory relative to the working
/// directory.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `./Sales_Data/`
/// 2. `./sales_data/`
/// 3. `./data/`
///
/// Returns `None` when none of the candidates exist.
pub fn discover_data_path() -> Option<PathBuf> {
    discover_data_path_in(std::path::Path::new("."))
}

/// Discovery rooted at an explicit base directory (used for testing).
pub fn discover_data_path_in(base: &std::path::Path) -> Option<PathBuf> {
    let candidates = [
        base.join("Sales_Data"),
        base.join("sales_data"),
        base.join("data"),
    ];
    candidates.into_iter().find(|p| p.is_dir())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        // Restore HOME.
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let report_dir = tmp.path().join(".sales-report");
        assert!(report_dir.is_dir(), ".sales-report dir must exist");
        assert!(report_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    // ── test_discover_data_path ───────────────────────────────────────────────

    #[test]
    fn test_discover_data_path_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(
            discover_data_path_in(tmp.path()).is_none(),
            "should return None when no candidate path exists"
        );
    }

    #[test]
    fn test_discover_data_path_finds_sales_data() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("Sales_Data")).expect("create data dir");

        let path = discover_data_path_in(tmp.path());
        assert_eq!(path, Some(tmp.path().join("Sales_Data")));
    }

    #[test]
    fn test_discover_data_path_prefers_capitalised_dir() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("Sales_Data")).expect("create data dir");
        std::fs::create_dir_all(tmp.path().join("data")).expect("create data dir");

        let path = discover_data_path_in(tmp.path());
        assert_eq!(path, Some(tmp.path().join("Sales_Data")));
    }
}
