use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable layered over the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather "current weather" endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FORECAST_DAYS: u32 = 3;
const MAX_FORECAST_DAYS: u32 = 16;

/// Connection settings for the weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Request timeout; `timeout_secs = 0` falls back to the default instead
    /// of failing every request immediately.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// API key with blank values treated as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days used when the caller does not ask for a specific count.
    pub default_days: u32,
    /// Upper bound on requested days; each day costs one provider call.
    pub max_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_FORECAST_DAYS,
            max_days: MAX_FORECAST_DAYS,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
/// timeout_secs = 10
///
/// [forecast]
/// default_days = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load config from the platform config directory and layer
    /// `OPENWEATHER_API_KEY` on top of it.
    ///
    /// This is the only place the process environment is consulted.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    /// Load config from an explicit path, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-mcp", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    /// Returns the API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Replace the stored key with `value` when it is present and non-empty.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
    }
}
