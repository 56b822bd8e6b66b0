//! Application configuration.

/// Backend endpoint configuration.
pub mod api_config;
/// Application configuration file handling.
pub mod app_config;
/// CLI argument definitions.
pub mod args;

pub use api_config::{ApiConfig, FEED_ENDPOINT, FEED_ENDPOINT_ALT};
pub use app_config::{AppConfig, FeedSection, LogLevel};
pub use args::{CliArgs, Command};
