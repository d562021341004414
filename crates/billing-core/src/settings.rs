use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{ChartType, FilterParams};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate views over a healthcare billing dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "billing-dashboard",
    about = "Aggregate views over a healthcare billing dataset",
    version
)]
pub struct Settings {
    /// Path to the healthcare CSV file
    #[arg(long, default_value = "assets/healthcare.csv")]
    pub data_path: PathBuf,

    /// Which chart (or the summary header) to render
    #[arg(long, default_value = "all", value_parser = ["summary", "age", "conditions", "insurance", "billing", "trends", "all"])]
    pub view: String,

    /// Only include patients of this gender
    #[arg(long)]
    pub gender: Option<String>,

    /// Only include admissions for this medical condition (trends view)
    #[arg(long)]
    pub condition: Option<String>,

    /// Billing ceiling for the billing histogram (defaults to the median)
    #[arg(long)]
    pub ceiling: Option<f64>,

    /// Chart type hint for admission trends
    #[arg(long, default_value = "line", value_parser = ["line", "bar"])]
    pub chart_type: String,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Forget saved chart type and output format
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Presentation preferences persisted to `~/.healthcare-dashboard/last_used.json`.
///
/// Filters are never stored; every run starts unfiltered unless told otherwise.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// Default location, rooted at the user's home directory.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".healthcare-dashboard").join("last_used.json")
    }

    /// Load persisted params. Missing or corrupt files yield `Default`.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and fill unset presentation options from the
    /// last-used file.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Parse `args` and take `chart_type` / `format` from `config_path` when
    /// they were not given on the command line. Reads only; see
    /// [`Settings::update_last_used_at`] for the write side.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            return settings;
        }

        let last = LastUsedParams::load_from(config_path);

        // clap keys args by field name, so `chart_type` not `chart-type`.
        if !is_arg_explicitly_set(&matches, "chart_type") {
            if let Some(v) = last.chart_type.filter(|v| v.parse::<ChartType>().is_ok()) {
                settings.chart_type = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format.filter(|v| v == "table" || v == "json") {
                settings.format = v;
            }
        }

        settings
    }

    /// Write the current presentation options to the default last-used file,
    /// or delete it under `--clear`.
    pub fn update_last_used(&self) -> Result<(), std::io::Error> {
        self.update_last_used_at(&LastUsedParams::config_path())
    }

    pub fn update_last_used_at(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if self.clear {
            LastUsedParams::clear_at(config_path)
        } else {
            LastUsedParams::from(self).save_to(config_path)
        }
    }

    /// Build the pipeline filter from the CLI selection.
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            gender: self.gender.clone(),
            medical_condition: self.condition.clone(),
            billing_ceiling: self.ceiling,
            chart_type: self.chart_type.parse().ok(),
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            chart_type: Some(s.chart_type.clone()),
            format: Some(s.format.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied on the command line rather than
/// coming from a default.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            chart_type: Some("bar".to_string()),
            format: Some("json".to_string()),
        };
        params.save_to(&path).expect("save");

        assert_eq!(LastUsedParams::load_from(&path), params);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
        // Clearing twice is fine.
        LastUsedParams::clear_at(&path).expect("clear again");
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["billing-dashboard"]);

        assert_eq!(settings.data_path, PathBuf::from("assets/healthcare.csv"));
        assert_eq!(settings.view, "all");
        assert!(settings.gender.is_none());
        assert!(settings.condition.is_none());
        assert!(settings.ceiling.is_none());
        assert_eq!(settings.chart_type, "line");
        assert_eq!(settings.format, "table");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["billing-dashboard", "--view", "pie"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_params_from_settings() {
        let settings = Settings::parse_from([
            "billing-dashboard",
            "--gender",
            "Male",
            "--ceiling",
            "20000",
            "--chart-type",
            "bar",
        ]);
        let params = settings.filter_params();
        assert_eq!(params.gender(), Some("Male"));
        assert!(params.medical_condition().is_none());
        assert_eq!(params.billing_ceiling, Some(20_000.0));
        assert_eq!(params.chart_type(), ChartType::Bar);
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    fn run_with(args: &[&str], config_path: &Path) -> Settings {
        let mut argv: Vec<std::ffi::OsString> = vec!["billing-dashboard".into()];
        argv.extend(args.iter().map(|a| std::ffi::OsString::from(*a)));
        let settings = Settings::load_with_last_used_impl(argv, config_path);
        settings.update_last_used_at(config_path).expect("update");
        settings
    }

    #[test]
    fn test_load_with_last_used_restores_presentation_options() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            chart_type: Some("bar".to_string()),
            format: Some("json".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["billing-dashboard".into()], &config_path);
        assert_eq!(settings.chart_type, "bar");
        assert_eq!(settings.format, "json");
    }

    #[test]
    fn test_filters_do_not_carry_over_between_runs() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        run_with(&["--gender", "Female", "--condition", "Asthma"], &config_path);
        let second = run_with(&["--view", "conditions"], &config_path);

        assert!(second.gender.is_none());
        assert!(second.condition.is_none());
        assert!(second.filter_params().gender().is_none());
        assert!(second.filter_params().medical_condition().is_none());

        let stored = std::fs::read_to_string(&config_path).expect("read");
        assert!(!stored.contains("Female"));
        assert!(!stored.contains("Asthma"));
    }

    #[test]
    fn test_stale_filter_keys_in_file_are_ignored() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            r#"{"gender":"Male","condition":"Cancer","chart_type":"bar"}"#,
        )
        .unwrap();

        let settings =
            Settings::load_with_last_used_impl(vec!["billing-dashboard".into()], &config_path);
        assert!(settings.gender.is_none());
        assert!(settings.condition.is_none());
        assert_eq!(settings.chart_type, "bar");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            chart_type: Some("bar".to_string()),
            format: Some("json".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = run_with(&["--chart-type", "line", "--format", "table"], &config_path);
        assert_eq!(settings.chart_type, "line");
        assert_eq!(settings.format, "table");
        assert_eq!(
            LastUsedParams::load_from(&config_path).chart_type.as_deref(),
            Some("line")
        );
    }

    #[test]
    fn test_load_with_last_used_ignores_invalid_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            chart_type: Some("scatter".to_string()),
            format: Some("xml".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["billing-dashboard".into()], &config_path);
        assert_eq!(settings.chart_type, "line");
        assert_eq!(settings.format, "table");
    }

    #[test]
    fn test_clear_removes_file_and_skips_merge() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            chart_type: Some("bar".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = run_with(&["--clear"], &config_path);

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.chart_type, "line");
    }

    #[test]
    fn test_load_with_last_used_does_not_write() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["billing-dashboard".into(), "--format".into(), "json".into()],
            &config_path,
        );
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["billing-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_update_last_used_persists_presentation_options() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        run_with(&["--chart-type", "bar"], &config_path);

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.chart_type.as_deref(), Some("bar"));
        assert_eq!(loaded.format.as_deref(), Some("table"));
    }
}
