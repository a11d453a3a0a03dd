//! Configuration management for newsroom.
//!
//! Configuration is read from `~/.config/newsroom/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

/// News API client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto (must end with `/`)
    pub base_url: String,
    pub api_key: String,
    /// Language code sent with every request
    pub language: String,
    /// Country used for the home screen headlines; empty means worldwide
    pub default_country: String,
    /// Country used when browsing a category
    pub category_country: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4/".to_string(),
            api_key: String::new(),
            language: "en".to_string(),
            default_country: String::new(),
            category_country: "in".to_string(),
            timeout_secs: 30,
            user_agent: format!("newsroom/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed query is sent, in milliseconds
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 10_000 }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Identity provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub base_url: String,
    pub api_key: String,
    /// Keep the signed-in user across runs
    pub persist_session: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com/v1/".to_string(),
            api_key: String::new(),
            persist_session: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Favorites database; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/newsroom/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsroom").join("config.toml"))
    }

    /// Create a default config file with comments.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
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

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newsroom configuration

[api]
# GNews v4 endpoint and key (https://gnews.io)
base_url = "https://gnews.io/api/v4/"
api_key = ""
language = "en"

# Country for the home screen headlines; leave empty for worldwide
default_country = ""

# Country used when browsing a category
category_country = "in"

# Request timeout in seconds
timeout_secs = 30

[search]
# How long the search box must stay unchanged before a query is sent
debounce_ms = 10000

[auth]
# Identity Toolkit (Firebase Auth) REST endpoint and web API key
base_url = "https://identitytoolkit.googleapis.com/v1/"
api_key = ""

# Stay signed in between runs
persist_session = true

[storage]
# Saved articles database; defaults to the platform data directory
# database_path = "/path/to/newsroom.db"
"##
        .to_string()
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
