use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default backend endpoint used when no override is supplied.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the doculens client.
///
/// The session core is instance-scoped, so configuration is constructed once
/// and handed to the backend client rather than cached in a process global.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the extraction backend.
    pub backend_url: String,
    /// Optional timeout applied to each backend request.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self {
            backend_url: load_env_optional("DOCULENS_BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            request_timeout: load_env_optional("DOCULENS_REQUEST_TIMEOUT_SECS")
                .map(|value| {
                    value.parse().map(Duration::from_secs).map_err(|_| {
                        ConfigError::InvalidValue("DOCULENS_REQUEST_TIMEOUT_SECS".to_string())
                    })
                })
                .transpose()?,
        };
        tracing::debug!(
            backend_url = %config.backend_url,
            request_timeout = ?config.request_timeout,
            "Loaded configuration"
        );
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: None,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
