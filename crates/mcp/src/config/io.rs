//! Configuration IO helpers for the report facade.

use crate::config::{ConfigError, ReportsConfig, validate_config};
use dirs_next::config_dir;
use ktl_reports_util::expand_tilde;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "KTL_REPORTS_CONFIG";

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ktl-reports")
        .join("config.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<ReportsConfig, ConfigError> {
    let path = default_config_path();
    load_config_from_path(&path)
}

/// Loads and validates configuration from a specific path.
///
/// A missing file yields the defaults. Files ending in `.yaml` or `.yml` are
/// parsed as YAML, everything else as JSON.
pub fn load_config_from_path(path: &Path) -> Result<ReportsConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(ReportsConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: ReportsConfig = if is_yaml(path) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    validate_config(&config)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("yaml") || extension.eq_ignore_ascii_case("yml"))
}
