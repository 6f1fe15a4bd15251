//! Configuration loading
//!
//! Resolution follows a priority order:
//! 1. Explicit path (highest priority)
//! 2. `VSKIP_CONFIG` environment variable
//! 3. `~/.config/vskip/config.toml` (platform config dir)
//! 4. Built-in defaults (fallback)
//!
//! After loading, `VSKIP_TMDB_API_KEY` overrides the configured API key
//! so the key never has to live in a file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VSKIP_CONFIG";

/// Environment variable overriding the provider API key
pub const API_KEY_ENV_VAR: &str = "VSKIP_TMDB_API_KEY";

/// Metadata provider settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider API base URL
    pub base_url: String,
    /// API key appended to every lookup
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity before lagging subscribers drop events
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Top-level vskip configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct VskipConfig {
    pub provider: ProviderConfig,
    pub events: EventsConfig,
}

impl VskipConfig {
    /// Load configuration following the priority order above
    ///
    /// A missing file at the default location is not an error (defaults
    /// apply); an explicit or env-var path that cannot be read is.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit)? {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let config: VskipConfig = toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                tracing::debug!(path = %path.display(), "loaded configuration file");
                config
            }
            None => VskipConfig::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            config.provider.api_key = key;
        }

        Ok(config)
    }
}

/// Resolve which config file to read, if any
fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    // Priority 1: explicit path (must exist)
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    // Priority 2: environment variable (must exist)
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(Error::Config(format!(
                "{} points to a missing file: {}",
                CONFIG_ENV_VAR,
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    // Priority 3: platform config dir, optional
    if let Some(path) = default_config_path() {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // Priority 4: built-in defaults
    Ok(None)
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vskip").join("config.toml"))
}
