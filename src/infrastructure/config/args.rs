//! CLI argument definitions.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "courierdesk",
    version,
    about = "Headless client for the delivery marketplace admin console",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend root URL.
    #[arg(long, env = "API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Command to run; defaults to tailing the activity feed.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Authenticate and store the session credential pair.
    Login {
        /// Admin login email.
        #[arg(long)]
        email: String,

        /// Admin password.
        #[arg(long, env = "COURIERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Invalidate the session and clear stored credentials.
    Logout,
    /// Stream the live activity feed to the terminal.
    Tail,
    /// Probe both feed endpoint variants and report reachability.
    Probe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_is_default() {
        let args = CliArgs::parse_from(["courierdesk"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_login_subcommand_parses() {
        let args = CliArgs::parse_from([
            "courierdesk",
            "--api-url",
            "http://localhost:9000",
            "login",
            "--email",
            "admin@example.com",
            "--password",
            "hunter2",
        ]);

        assert_eq!(args.api_url.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(args.command, Some(Command::Login { .. })));
    }
}
