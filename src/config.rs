//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How the game entry slice is refreshed after a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Commit the values that were submitted, without another round trip.
    #[default]
    TrustSubmitted,
    /// Re-fetch the entry after the write and commit the server's copy.
    RefetchAfterWrite,
}

/// Log output format for the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the DisplayCase REST API (no trailing slash needed)
    pub api_url: String,
    /// Directory holding the persisted session record
    pub session_dir: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Update policy for game entries
    pub write_policy: WritePolicy,
    /// Log format for the CLI
    pub log_format: LogFormat,
}

const DEFAULT_SESSION_DIR: &str = ".displaycase";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            write_policy: WritePolicy::TrustSubmitted,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("DISPLAYCASE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .map_err(|_| ConfigError::Missing("DISPLAYCASE_API_URL"))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "DISPLAYCASE_API_URL",
                value: api_url,
            });
        }

        let http_timeout = match env::var("DISPLAYCASE_HTTP_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "DISPLAYCASE_HTTP_TIMEOUT_SECS",
                    value: v,
                })?,
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let write_policy = match env::var("DISPLAYCASE_REFETCH_AFTER_UPDATE").as_deref() {
            Ok("1") | Ok("true") | Ok("yes") => WritePolicy::RefetchAfterWrite,
            _ => WritePolicy::TrustSubmitted,
        };

        let log_format = match env::var("DISPLAYCASE_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            api_url,
            session_dir: env::var("DISPLAYCASE_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR)),
            http_timeout,
            write_policy,
            log_format,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
