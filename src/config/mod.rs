//! Configuration management for postdeck.
//!
//! Configuration is read from `~/.config/postdeck/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::paging::PagingConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub paging: PagingConfig,
    pub store: StoreConfig,
}

/// Where and how the item collection is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Passed through to the endpoint; it serves the whole set regardless.
    pub page: u32,
    pub limit: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com/".to_string(),
            timeout_secs: 10,
            page: 1,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. Defaults to `{data_dir}/postdeck/postdeck.db`.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path`, or from the default path if `None`.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/postdeck/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("postdeck").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# postdeck configuration

[remote]
# Endpoint root; items are read from "<base_url>photos"
base_url = "https://jsonplaceholder.typicode.com/"

# Request timeout in seconds
timeout_secs = 10

# Query parameters sent with the request
page = 1
limit = 20

[paging]
# Items per page read from the local cache
page_size = 20

# Load the next page when the reader gets this close to the end
prefetch_distance = 5

# Report the total cached count so the UI can reserve rows
enable_placeholders = false

[store]
# Database file (default: <data dir>/postdeck/postdeck.db)
# db_path = "/path/to/postdeck.db"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
