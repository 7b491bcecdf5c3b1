//! Client configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default interval between payment status checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Default tick budget for one poll session (10 minutes at the default interval).
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 200;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_base: String,
    /// File holding the persisted access credential
    pub credentials_path: PathBuf,
    /// Interval between payment status checks
    pub poll_interval: Duration,
    /// Maximum status checks per session; `None` polls until cancelled
    pub poll_max_attempts: Option<u32>,
    /// Delay before redirecting home after a successful payment
    pub redirect_delay: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            credentials_path: PathBuf::from(".legal-ai/credentials.json"),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_max_attempts: Some(DEFAULT_POLL_MAX_ATTEMPTS),
            redirect_delay: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base = env::var("LEGAL_AI_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .map_err(|_| ConfigError::Missing("LEGAL_AI_API_BASE"))?;
        if api_base.is_empty() {
            return Err(ConfigError::Missing("LEGAL_AI_API_BASE"));
        }

        let poll_max_attempts =
            match parse_var("LEGAL_AI_POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS)? {
                0 => None,
                n => Some(n),
            };

        let poll_interval_ms = parse_var("LEGAL_AI_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "LEGAL_AI_POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_base,
            credentials_path: env::var("LEGAL_AI_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".legal-ai/credentials.json")),
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_max_attempts,
            redirect_delay: Duration::from_millis(parse_var("LEGAL_AI_REDIRECT_DELAY_MS", 3000)?),
            request_timeout: Duration::from_secs(parse_var("LEGAL_AI_REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Read a numeric variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
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
