// crates/dashboard-terminal/src/config.rs
//
// Terminal configuration. Layers, lowest to highest precedence:
// built-in defaults, a TOML file (`--config`), environment variables
// (`DASHBOARD_GATEWAY_URL`, `DASHBOARD_USER_ID`), then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use dashboard_core::{SessionConfig, Symbol, UserId, ValidationError};
use dashboard_gateway::GatewayConfig;

pub const ENV_GATEWAY_URL: &str = "DASHBOARD_GATEWAY_URL";
pub const ENV_USER_ID: &str = "DASHBOARD_USER_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("default_symbol: {0}")]
    Symbol(#[from] ValidationError),

    #[error("user_id must not be empty")]
    EmptyUserId,

    #[error("request_timeout_secs must be at least 1")]
    ZeroTimeout,
}

/// Configuration for the terminal dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub gateway_url: String,
    pub user_id: String,
    pub request_timeout_secs: u64,
    /// Unset means a connected session never expires.
    pub session_ttl_secs: Option<u64>,
    pub default_symbol: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        let gateway = GatewayConfig::default();
        Self {
            gateway_url: gateway.base_url,
            user_id: UserId::DEFAULT.to_string(),
            request_timeout_secs: gateway.timeout.as_secs(),
            session_ttl_secs: None,
            default_symbol: Symbol::default().as_str().to_string(),
        }
    }
}

impl TerminalConfig {
    /// Defaults, or the given TOML file on top of them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            self.gateway_url = url;
        }
        if let Some(user) = lookup(ENV_USER_ID) {
            self.user_id = user;
        }
    }

    pub fn apply_overrides(
        &mut self,
        gateway_url: Option<String>,
        user_id: Option<String>,
        symbol: Option<String>,
    ) {
        if let Some(url) = gateway_url {
            self.gateway_url = url;
        }
        if let Some(user) = user_id {
            self.user_id = user;
        }
        if let Some(symbol) = symbol {
            self.default_symbol = symbol;
        }
    }

    pub fn user(&self) -> Result<UserId, ConfigError> {
        let id = self.user_id.trim();
        if id.is_empty() {
            return Err(ConfigError::EmptyUserId);
        }
        Ok(UserId::new(id))
    }

    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(GatewayConfig {
            base_url: self.gateway_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        Ok(SessionConfig {
            ttl: self.session_ttl_secs.map(Duration::from_secs),
            default_symbol: self.default_symbol.parse()?,
        })
    }
}
