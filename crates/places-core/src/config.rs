use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::paths::{DataDirRoot, FixedRoot, RootResolver};

/// Search never returns more rows than this
pub const MAX_SEARCH_MATCHES: u32 = 20;

/// Places not visited within this many days are dropped when the store opens
pub const EXPIRE_DAYS: i64 = 30;

/// Main configuration structure
///
/// Loaded from the config file if there is one, defaults otherwise.
/// The defaults are exactly what the store has always done.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load config from default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            debug!("No config at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("places");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Overrides the activity root; the platform data dir is used otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,

    #[serde(default = "default_max_search_matches")]
    pub max_search_matches: u32,

    /// Retention window for the expiry sweep
    #[serde(default = "default_expire_days")]
    pub expire_days: i64,
}

fn default_max_search_matches() -> u32 {
    MAX_SEARCH_MATCHES
}

fn default_expire_days() -> i64 {
    EXPIRE_DAYS
}

impl StoreConfig {
    /// Pick the root resolver this config asks for
    pub fn resolver(&self) -> Box<dyn RootResolver> {
        match &self.data_root {
            Some(root) => Box::new(FixedRoot::new(root)),
            None => Box::new(DataDirRoot::default()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            max_search_matches: default_max_search_matches(),
            expire_days: default_expire_days(),
        }
    }
}
