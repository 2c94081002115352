//! Configuration loading and remote endpoint resolution
//!
//! Settings come from a small TOML bootstrap file. The remote base URL is
//! resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `MEALDESK_BASE_URL`
//! 3. TOML config file `base_url`
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: a warning is logged and defaults
//! are used. A config file that exists but cannot be parsed is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable overriding the remote base URL
pub const BASE_URL_ENV: &str = "MEALDESK_BASE_URL";

/// Compiled default for the remote food service
pub const DEFAULT_BASE_URL: &str = "https://6852821e0594059b23cdd834.mockapi.io";

/// Records shown per page
pub const DEFAULT_PAGE_SIZE: usize = 6;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Wire layout used for `PUT /Food/:id` bodies
///
/// Two incompatible layouts have been observed against the same service; only
/// one is sent per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateBodyFormat {
    /// `food_name, food_rating, food_image, restaurant_name, restaurant_logo, restaurant_status`
    #[default]
    Prefixed,
    /// `name, rating, image, restaurantName, restaurant_logo, restaurant_status`
    Mixed,
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Remote service base URL (without the `/Food` resource path)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Records shown per page
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Layout for update bodies
    #[serde(default)]
    pub update_body: UpdateBodyFormat,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub page_size: usize,
    pub update_body: UpdateBodyFormat,
    /// Default tracing directive (`RUST_LOG` and `--log-level` take precedence)
    pub log_level: String,
    /// Log to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl ClientSettings {
    /// Resolve settings from CLI override, environment and TOML config
    pub fn resolve(cli_base_url: Option<&str>, toml: &TomlConfig) -> Result<Self> {
        let base_url = resolve_base_url(cli_base_url, toml);
        let page_size = toml.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(toml.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            page_size,
            update_body: toml.update_body,
            log_level: toml.logging.level.clone(),
            log_file: toml.logging.file.clone(),
        })
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            update_body: UpdateBodyFormat::default(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Base URL resolution: CLI → ENV → TOML → compiled default
///
/// Trailing slashes are removed so resource paths can be appended directly.
pub fn resolve_base_url(cli_arg: Option<&str>, toml: &TomlConfig) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg.filter(|u| !u.trim().is_empty()) {
        return trim_base(url);
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            return trim_base(&url);
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = toml.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return trim_base(url);
    }

    // Priority 4: Compiled default
    DEFAULT_BASE_URL.to_string()
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Default config file path: `<config dir>/mealdesk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mealdesk").join("config.toml"))
}

/// Load the TOML config, degrading to defaults when the file is absent
///
/// `path` overrides the default location.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory, using defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!("Config file not found at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_base_strips_trailing_slashes() {
        assert_eq!(trim_base(" https://api.example/// "), "https://api.example");
    }

    #[test]
    fn test_toml_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert!(config.base_url.is_none());
        assert_eq!(config.update_body, UpdateBodyFormat::Prefixed);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_update_body_parses() {
        let config: TomlConfig = toml::from_str("update_body = \"mixed\"").unwrap();
        assert_eq!(config.update_body, UpdateBodyFormat::Mixed);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = TomlConfig {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(ClientSettings::resolve(Some("http://x"), &config).is_err());
    }
}
