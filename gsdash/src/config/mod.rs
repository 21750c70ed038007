//! Configuration for the `gsdash` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/gsdash/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use gsdash_proto::DEFAULT_PAGE_SIZE;

use crate::api::{ApiClient, ApiError, Endpoints};
use crate::app::DEFAULT_TIMESTAMP_FORMAT;
use crate::net::NetConfig;
use crate::route::Route;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A setting parsed but cannot be used.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerFileConfig,
    poll: PollFileConfig,
    ui: UiFileConfig,
    channel_capacity: Option<usize>,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    task_info_path: Option<String>,
    cancel_path: Option<String>,
    resource_info_path: Option<String>,
    add_task_path: Option<String>,
    add_resource_path: Option<String>,
}

/// `[poll]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct PollFileConfig {
    task_interval_secs: Option<u64>,
    resource_interval_secs: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    page_size: Option<u32>,
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Server --
    /// Base address of the task server.
    pub base_url: String,
    pub request_timeout: Duration,
    pub endpoints: Endpoints,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,

    // -- Polling --
    pub task_interval: Duration,
    pub resource_interval: Duration,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Records per page in both lists.
    pub page_size: u32,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
    /// Screen shown at startup.
    pub start_route: Route,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            endpoints: Endpoints::default(),
            channel_capacity: 256,
            task_interval: Duration::from_secs(10),
            resource_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_millis(50),
            page_size: DEFAULT_PAGE_SIZE,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            start_route: Route::Tasks,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read,
    /// or if any config file that exists cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall polling or break rendering.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const NOT_ZERO: &str = "must be greater than zero";
        let invalid = |key| {
            Err(ConfigError::Invalid {
                key,
                reason: NOT_ZERO,
            })
        };

        if self.task_interval.is_zero() {
            return invalid("task_interval_secs");
        }
        if self.resource_interval.is_zero() {
            return invalid("resource_interval_secs");
        }
        if self.request_timeout.is_zero() {
            return invalid("request_timeout_secs");
        }
        if self.channel_capacity == 0 {
            return invalid("channel_capacity");
        }
        if self.page_size == 0 {
            return invalid("page_size");
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                key: "timestamp_format",
                reason: "not a valid strftime format",
            });
        }
        Ok(())
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let base_paths = if cli.legacy_endpoints {
            Endpoints::legacy()
        } else {
            defaults.endpoints
        };
        let server = &file.server;

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| server.base_url.clone())
                .unwrap_or(defaults.base_url),
            request_timeout: server
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            endpoints: Endpoints {
                task_info: server
                    .task_info_path
                    .clone()
                    .unwrap_or(base_paths.task_info),
                cancel: server.cancel_path.clone().unwrap_or(base_paths.cancel),
                resource_info: server
                    .resource_info_path
                    .clone()
                    .unwrap_or(base_paths.resource_info),
                add_task: server.add_task_path.clone().unwrap_or(base_paths.add_task),
                add_resource: server
                    .add_resource_path
                    .clone()
                    .unwrap_or(base_paths.add_resource),
            },
            channel_capacity: file.channel_capacity.unwrap_or(defaults.channel_capacity),
            task_interval: cli
                .poll_secs
                .or(file.poll.task_interval_secs)
                .map_or(defaults.task_interval, Duration::from_secs),
            resource_interval: cli
                .poll_secs
                .or(file.poll.resource_interval_secs)
                .map_or(defaults.resource_interval, Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            page_size: cli
                .page_size
                .or(file.ui.page_size)
                .unwrap_or(defaults.page_size),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
            start_route: cli
                .route
                .as_deref()
                .map_or(defaults.start_route, Route::from_path),
        }
    }

    /// Build the networking config from resolved settings.
    #[must_use]
    pub const fn to_net_config(&self) -> NetConfig {
        NetConfig {
            task_interval: self.task_interval,
            resource_interval: self.resource_interval,
            channel_capacity: self.channel_capacity,
        }
    }

    /// Build the HTTP client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn api_client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(&self.base_url, self.endpoints.clone(), self.request_timeout)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal dashboard for a grid-search task server")]
pub struct CliArgs {
    /// Base URL of the task server.
    #[arg(long, env = "GSDASH_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/gsdash/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the first server release's endpoint paths (`/info`, `/add`).
    #[arg(long)]
    pub legacy_endpoints: bool,

    /// Poll interval for both lists, in seconds.
    #[arg(long)]
    pub poll_secs: Option<u64>,

    /// Records per page.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Timestamp display format (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Screen to open at startup (`/tasks` or `/resources`).
    #[arg(long)]
    pub route: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "GSDASH_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/gsdash.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist. Otherwise the default
/// path is tried and a missing file is treated as an empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("gsdash").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
