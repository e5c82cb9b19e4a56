use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly sales analysis and terminal reporting
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-report",
    about = "Consolidate monthly sales CSV files and report business aggregates",
    version
)]
pub struct Settings {
    /// Directory containing the monthly sales CSV files (auto-discovered if not specified)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path of the consolidated pre-cleaning CSV export
    #[arg(long, default_value = "all_data.csv")]
    pub export_file: PathBuf,

    /// Skip writing the consolidated export
    #[arg(long)]
    pub no_export: bool,

    /// Report tab shown first
    #[arg(long, default_value = "months", value_parser = ["months", "cities", "hours", "products", "pairs"])]
    pub view: String,

    /// Number of co-purchased product pairs to report (1-100)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_pairs: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sales-report/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_pairs: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.sales-report/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".sales-report").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Self::load_with_last_used`] but accepts an explicit argument
    /// list, enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on the
        // command line (CLI always wins).  Paths are never loaded from
        // last-used; the data location must stay predictable per invocation.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_pairs") {
            if let Some(v) = last.top_pairs {
                settings.top_pairs = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.  Theme `"auto"` is resolved in the
    /// UI layer from the detected terminal background.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            view: Some(s.view.clone()),
            top_pairs: Some(s.top_pairs),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn args(list: &[&str]) -> Vec<OsString> {
        std::iter::once("sales-report")
            .chain(list.iter().copied())
            .map(OsString::from)
            .collect()
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_settings_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_with_last_used_impl(args(&[]), &tmp_config_path(&tmp));

        assert!(settings.data_dir.is_none());
        assert_eq!(settings.export_file, PathBuf::from("all_data.csv"));
        assert!(!settings.no_export);
        assert_eq!(settings.view, "months");
        assert_eq!(settings.top_pairs, 10);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn test_debug_flag_overrides_log_level() {
        let tmp = TempDir::new().unwrap();
        let settings =
            Settings::load_with_last_used_impl(args(&["--debug"]), &tmp_config_path(&tmp));
        assert_eq!(settings.log_level, "DEBUG");
    }

    // ── LastUsedParams persistence ────────────────────────────────────────────

    #[test]
    fn test_last_used_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("cities".to_string()),
            top_pairs: Some(25),
        };
        params.save_to(&path).unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert_eq!(loaded.view.as_deref(), Some("cities"));
        assert_eq!(loaded.top_pairs, Some(25));
    }

    #[test]
    fn test_last_used_load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let loaded = LastUsedParams::load_from(&tmp.path().join("does-not-exist.json"));
        assert!(loaded.theme.is_none());
        assert!(loaded.view.is_none());
    }

    #[test]
    fn test_last_used_load_corrupt_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corrupt.json");
        std::fs::write(&path, "{not json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.theme.is_none());
    }

    // ── Merge semantics ───────────────────────────────────────────────────────

    #[test]
    fn test_last_used_fills_unset_args() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("classic".to_string()),
            view: Some("pairs".to_string()),
            top_pairs: Some(5),
        }
        .save_to(&path)
        .unwrap();

        let settings = Settings::load_with_last_used_impl(args(&[]), &path);
        assert_eq!(settings.theme, "classic");
        assert_eq!(settings.view, "pairs");
        assert_eq!(settings.top_pairs, 5);
    }

    #[test]
    fn test_cli_wins_over_last_used() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("classic".to_string()),
            view: Some("pairs".to_string()),
            top_pairs: Some(5),
        }
        .save_to(&path)
        .unwrap();

        let settings =
            Settings::load_with_last_used_impl(args(&["--view", "hours", "--theme", "dark"]), &path);
        assert_eq!(settings.view, "hours");
        assert_eq!(settings.theme, "dark");
        // Not passed on the CLI, so last-used still applies.
        assert_eq!(settings.top_pairs, 5);
    }

    #[test]
    fn test_settings_persisted_for_next_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        let _ = Settings::load_with_last_used_impl(args(&["--view", "products"]), &path);

        let saved = LastUsedParams::load_from(&path);
        assert_eq!(saved.view.as_deref(), Some("products"));
    }

    #[test]
    fn test_clear_deletes_saved_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("dark".to_string()),
            view: None,
            top_pairs: None,
        }
        .save_to(&path)
        .unwrap();
        assert!(path.exists());

        let _ = Settings::load_with_last_used_impl(args(&["--clear"]), &path);
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_does_not_repersist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp_config_path(&tmp);

        let _ = Settings::load_with_last_used_impl(args(&["--clear", "--view", "cities"]), &path);
        assert!(!path.exists());
    }
}
