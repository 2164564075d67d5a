//! Server configuration with validation and environment overrides.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default listen port when `CROWDASK_PORT` is unset.
pub const DEFAULT_PORT: u16 = 4000;

/// Crowdask server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Listen port for both HTTP and WebSocket traffic.
    pub port: u16,
    /// Directory with the built frontend. `None` disables static serving.
    pub static_dir: Option<PathBuf>,
    /// Shared moderator secret. `None` means moderation is locked out.
    pub moderator_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: None,
            moderator_secret: None,
        }
    }
}

impl ServerConfig {
    /// Builds a config from defaults plus `CROWDASK_*` environment
    /// variables: `CROWDASK_HOST`, `CROWDASK_PORT`, `CROWDASK_STATIC_DIR`,
    /// `CROWDASK_MODERATOR_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("CROWDASK_HOST") {
            config.host = host
                .parse()
                .map_err(|_| ConfigError::InvalidHost(host))?;
        }
        if let Ok(port) = std::env::var("CROWDASK_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Ok(dir) = std::env::var("CROWDASK_STATIC_DIR") {
            config.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(secret) = std::env::var("CROWDASK_MODERATOR_SECRET") {
            config.moderator_secret = Some(secret);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort("0".into()));
        }
        if let Some(secret) = &self.moderator_secret {
            if secret.trim().is_empty() {
                return Err(ConfigError::EmptySecret);
            }
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host address: {0}")]
    InvalidHost(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("moderator secret must not be empty when set")]
    EmptySecret,
}
