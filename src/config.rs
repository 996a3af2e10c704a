//! Command-line/environment settings and logging setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

/// Command-line interface. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "user-console", version, about = "Manage user records over a REST API")]
pub struct Cli {
    /// Base URL of the users API.
    #[arg(long, env = "USER_CONSOLE_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// Initial rows per page (3, 6 or 9).
    #[arg(long, env = "USER_CONSOLE_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, env = "USER_CONSOLE_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "USER_CONSOLE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Write logs to this file. Logging is off when unset.
    #[arg(long, env = "USER_CONSOLE_LOG")]
    pub log_file: Option<PathBuf>,
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if PAGE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("page size must be one of {PAGE_SIZES:?}"))
    }
}

/// Resolved runtime settings.
#[derive(Clone, Debug)]
pub struct Settings {
    pub api_url: String,
    pub page_size: usize,
    pub timeout: Duration,
    pub config_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        let config_dir = cli.config_dir.unwrap_or_else(default_config_dir);
        Self {
            api_url: cli.api_url,
            page_size: cli.page_size,
            timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            config_dir,
            log_file: cli.log_file,
        }
    }

    /// Path of a file inside the config directory.
    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(10),
            config_dir: default_config_dir(),
            log_file: None,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("user-console"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Route `tracing` output to `log_file`. The terminal belongs to the TUI, so
/// nothing is logged when no file is given.
pub fn init_tracing(log_file: Option<&Path>) {
    let Some(path) = log_file else {
        return;
    };

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("Warning: failed to open log file {}: {err}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["user-console"]);
        assert_eq!(cli.page_size, 3);
        assert_eq!(cli.timeout_secs, 10);
        let settings = Settings::from_cli(cli);
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert!(settings.config_file("theme.conf").ends_with("theme.conf"));
    }

    #[test]
    fn page_size_must_be_offered_size() {
        assert!(Cli::try_parse_from(["user-console", "--page-size", "6"]).is_ok());
        assert!(Cli::try_parse_from(["user-console", "--page-size", "4"]).is_err());
        assert!(Cli::try_parse_from(["user-console", "--page-size", "x"]).is_err());
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::parse_from([
            "user-console",
            "--api-url",
            "http://api.test/v1",
            "--config-dir",
            "/tmp/uc",
        ]);
        let settings = Settings::from_cli(cli);
        assert_eq!(settings.api_url, "http://api.test/v1");
        assert_eq!(settings.config_file("keybinds.conf"), PathBuf::from("/tmp/uc/keybinds.conf"));
    }
}
