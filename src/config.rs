//! Server configuration
//!
//! All configuration is read once at startup and passed explicitly through
//! [`crate::state::AppState`]. Handlers and the analysis orchestrator never
//! read environment variables themselves.

use std::time::Duration;

use thiserror::Error;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 8080;

/// Default delay between operation status polls.
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Upstream analysis service credentials. `None` when the environment
    /// does not provide them; the server still starts so liveness checks
    /// work, but analysis requests fail with a configuration error.
    pub analysis: Option<AnalysisConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Upstream document-analysis service configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Service base URL, e.g. `https://myresource.cognitiveservices.azure.com`.
    pub endpoint: String,
    /// Service API key, sent as `Ocp-Apim-Subscription-Key`.
    pub key: String,
    /// Delay between polls of a pending analysis operation.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: DEFAULT_PORT },
            analysis: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `PORT`: HTTP port (default 8080)
    /// - `AZURE_DI_ENDPOINT`: analysis service base URL
    /// - `AZURE_DI_KEY`: analysis service API key
    /// - `ANALYSIS_POLL_INTERVAL_MS`: poll delay in milliseconds (default 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let poll_interval = match std::env::var("ANALYSIS_POLL_INTERVAL_MS") {
            Ok(value) => {
                let millis = value.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "ANALYSIS_POLL_INTERVAL_MS",
                    value,
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        };

        let analysis = match (
            non_empty_var("AZURE_DI_ENDPOINT"),
            non_empty_var("AZURE_DI_KEY"),
        ) {
            (Some(endpoint), Some(key)) => Some(AnalysisConfig {
                // A trailing slash would produce `//` in request paths.
                endpoint: endpoint.trim_end_matches('/').to_string(),
                key,
                poll_interval,
            }),
            _ => None,
        };

        Ok(Self {
            server: ServerConfig { port },
            analysis,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
