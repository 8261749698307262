//! Application configuration loaded from environment.

/// Default listening port for the cast control service.
pub const DEFAULT_PORT: u16 = 8080;

/// Receiver configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port the cast control service listens on (`CAST_PORT`).
    pub port: u16,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_vars(
            std::env::var("CAST_PORT").ok().as_deref(),
            std::env::var("LOG_LEVEL").ok().as_deref(),
        )
    }

    fn from_vars(port: Option<&str>, log_level: Option<&str>) -> Result<Self, ConfigLoadError> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigLoadError::InvalidPort(raw.to_string()))?,
            None => DEFAULT_PORT,
        };
        let log_level = log_level.unwrap_or("info").to_string();

        Ok(Self { port, log_level })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid CAST_PORT: {0}")]
    InvalidPort(String),
}
