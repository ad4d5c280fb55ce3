use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::endpoint::Endpoint;

pub const DEFAULT_BASE_URL: &str = "https://api.data.gov.sg";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path overrides for each endpoint, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub psi: String,
    pub two_hour_forecast: String,
    pub carpark_availability: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            psi: Endpoint::Psi.default_path().to_string(),
            two_hour_forecast: Endpoint::TwoHourForecast.default_path().to_string(),
            carpark_availability: Endpoint::CarparkAvailability.default_path().to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.data.gov.sg"
/// timeout_secs = 30
///
/// [endpoints]
/// psi = "/v1/environment/psi"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,

    /// Upper bound on any single request, applied by the HTTP transport.
    /// `0` disables the limit.
    pub timeout_secs: u64,

    pub endpoints: EndpointPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn endpoint_path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Psi => &self.endpoints.psi,
            Endpoint::TwoHourForecast => &self.endpoints.two_hour_forecast,
            Endpoint::CarparkAvailability => &self.endpoints.carpark_availability,
        }
    }

    pub fn set_endpoint_path(&mut self, endpoint: Endpoint, path: impl Into<String>) {
        let path = path.into();
        match endpoint {
            Endpoint::Psi => self.endpoints.psi = path,
            Endpoint::TwoHourForecast => self.endpoints.two_hour_forecast = path,
            Endpoint::CarparkAvailability => self.endpoints.carpark_availability = path,
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sgdata", "sgdata-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
