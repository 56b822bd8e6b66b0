//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;

const APP_NAME: &str = "courierdesk";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "courierdesk";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Feed resilience tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSection {
    /// Maximum automatic reconnect attempts before giving up.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Base reconnect delay in milliseconds; doubles per attempt.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Wall-clock window after which synthetic data is shown when no
    /// connection has succeeded.
    #[serde(default = "default_fallback_timeout_ms")]
    pub fallback_timeout_ms: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            fallback_timeout_ms: default_fallback_timeout_ms(),
        }
    }
}

/// Application configuration merged from file and CLI.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend root URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Feed resilience tuning.
    #[serde(default)]
    pub feed: FeedSection,
}

impl AppConfig {
    /// Loads configuration from the given file, or the default location,
    /// falling back to defaults when no file exists.
    #[must_use]
    pub fn load(path: Option<&PathBuf>) -> Self {
        let candidate = path.cloned().or_else(Self::default_config_path);

        let Some(candidate) = candidate else {
            return Self::default();
        };

        match std::fs::read_to_string(&candidate) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = &args.api_url {
            self.api_url = Some(api_url.clone());
        }
    }

    /// Returns the effective backend root URL.
    #[must_use]
    pub fn effective_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| super::api_config::DEFAULT_API_URL.to_string())
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("courierdesk.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

fn default_max_reconnect_attempts() -> u32 {
    crate::infrastructure::feed::MAX_RECONNECT_ATTEMPTS
}

#[allow(clippy::cast_possible_truncation)]
fn default_reconnect_delay_ms() -> u64 {
    crate::infrastructure::feed::RECONNECT_DELAY_BASE.as_millis() as u64
}

#[allow(clippy::cast_possible_truncation)]
fn default_fallback_timeout_ms() -> u64 {
    crate::infrastructure::feed::FALLBACK_TIMEOUT.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_feed_section() {
        let toml_content = r#"
            api_url = "https://console.example.com"
            log_level = "debug"

            [feed]
            max_reconnect_attempts = 3
            reconnect_delay_ms = 250
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(
            config.api_url.as_deref(),
            Some("https://console.example.com")
        );
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.feed.max_reconnect_attempts, 3);
        assert_eq!(config.feed.reconnect_delay_ms, 250);
        // Unset field keeps its default.
        assert_eq!(config.feed.fallback_timeout_ms, 5000);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api_url, None);
        assert_eq!(config.effective_api_url(), "http://127.0.0.1:8000");
        assert_eq!(config.feed.max_reconnect_attempts, 5);
    }
}
