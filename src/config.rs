//! Service configuration: `config.toml` + environment overrides.
//!
//! ```toml
//! [gateway]
//! host = "127.0.0.1"
//! port = 1337
//! client_dir = "./client"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 1337;
/// Maximum request body size (64KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every path outside `/api/`.
    pub client_dir: PathBuf,
    pub max_body_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            client_dir: PathBuf::from("./client"),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// `<platform config dir>/idgate/config.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "idgate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from an explicit path (must exist), or from the default path if present,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `IDGATE_HOST`, `IDGATE_PORT` and `IDGATE_CLIENT_DIR` as returned by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("IDGATE_HOST").filter(|v| !v.trim().is_empty()) {
            self.gateway.host = host.trim().to_owned();
        }
        if let Some(port) = lookup("IDGATE_PORT") {
            self.gateway.port = port
                .trim()
                .parse()
                .with_context(|| format!("IDGATE_PORT is not a valid port: {port}"))?;
        }
        if let Some(dir) = lookup("IDGATE_CLIENT_DIR").filter(|v| !v.trim().is_empty()) {
            self.gateway.client_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}
