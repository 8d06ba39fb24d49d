//! Application configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags (which may themselves come from the environment).

use crate::error::{Result, TxCastError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Broadcast relay used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// How a broadcast response that arrives after a newer request was issued
/// is treated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Only the response to the most recently issued request may set the label
    #[default]
    LatestRequest,
    /// Every response sets the label when it arrives, whichever request it answers
    LastResponse,
}

/// Effective configuration for every front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the broadcast relay, without the `/tx/broadcast` path
    pub endpoint: String,
    /// Request timeout; unset means wait indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Treatment of overlapping broadcasts
    pub stale_policy: StalePolicy,
    /// Directory for `txcast.log`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            stale_policy: StalePolicy::default(),
            log_dir: None,
            log_level: "txcast=info".to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub stale_policy: Option<StalePolicy>,
}

/// Configuration flags shared by both binaries
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Config file (default: <config dir>/txcast/config.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the broadcast relay
    #[arg(long, global = true, env = "TXCAST_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Which response may set the label when broadcasts overlap
    #[arg(long, global = true, value_enum)]
    pub stale_policy: Option<StalePolicy>,
}

impl ConfigArgs {
    /// Load the file named by `--config` (or the standard one) and apply the flags
    pub fn resolve(&self) -> Result<AppConfig> {
        AppConfig::load(self.config.as_deref())?.with_overrides(Overrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
            stale_policy: self.stale_policy,
        })
    }
}

impl AppConfig {
    /// Standard config file location (`<config dir>/txcast/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("txcast").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the standard location is
    /// used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TxCastError::ConfigRead(origin.clone(), e))?;
        Self::from_toml_str(&text, &origin)
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| TxCastError::ConfigParse(origin.to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if let Some(policy) = overrides.stale_policy {
            self.stale_policy = policy;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(TxCastError::InvalidConfig("endpoint is empty".to_string()));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(TxCastError::InvalidConfig(format!(
                "endpoint '{}' must start with http:// or https://",
                endpoint
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(TxCastError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Where `txcast.log` is written
    pub fn log_directory(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("txcast")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TxCastError::InvalidConfig(e.to_string()))
    }
}
