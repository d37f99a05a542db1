//! Configuration for the terminal front end.
//!
//! Values come from command-line flags, their environment fallbacks and an
//! optional RON file. Flags and environment win over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use grabber_engine::{ApiSettings, EngineConfig};
use grabber_logging::{LogDestination, LogSettings};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "grabber.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Terminal client for a playlist download backend.
#[derive(Debug, Default, Parser)]
#[command(name = "grabber", version, about)]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, env = "GRABBER_API_BASE")]
    pub api_base: Option<String>,

    /// WebSocket endpoint that pushes download progress.
    #[arg(long, env = "GRABBER_WS_URL")]
    pub ws_url: Option<String>,

    /// RON config file. Defaults to ./grabber.ron when present.
    #[arg(long, env = "GRABBER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Give up on backend requests after this many seconds. No limit by default.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Where log lines go.
    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path for file logging.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Playlist URL to fetch right after start-up.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub ws_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log: Option<LogTarget>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub log: LogSettings,
    pub initial_url: Option<String>,
}

impl AppConfig {
    /// Parse process arguments and load the config file they point to.
    pub fn load() -> Result<Self, ConfigError> {
        let cli = Cli::parse();
        let file = match &cli.config {
            Some(path) => Some(load_file(path)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Some(load_file(default_path)?)
                } else {
                    None
                }
            }
        };
        Self::resolve(cli, file.unwrap_or_default())
    }

    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = EngineConfig::default();
        let log_defaults = LogSettings::default();

        let level = match cli.log_level.or(file.log_level) {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(raw))?,
            None => log_defaults.level,
        };

        Ok(Self {
            engine: EngineConfig {
                api: ApiSettings {
                    base_url: cli
                        .api_base
                        .or(file.api_base)
                        .unwrap_or(defaults.api.base_url),
                    request_timeout: cli
                        .request_timeout_secs
                        .or(file.request_timeout_secs)
                        .map(Duration::from_secs),
                    ..defaults.api
                },
                ws_url: cli.ws_url.or(file.ws_url).unwrap_or(defaults.ws_url),
            },
            log: LogSettings {
                destination: cli
                    .log
                    .or(file.log)
                    .map(LogDestination::from)
                    .unwrap_or(log_defaults.destination),
                level,
                file_path: cli
                    .log_file
                    .or(file.log_file)
                    .unwrap_or(log_defaults.file_path),
            },
            initial_url: cli.url.filter(|url| !url.trim().is_empty()),
        })
    }
}

pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
