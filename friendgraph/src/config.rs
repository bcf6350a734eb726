use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "friendgraph.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {0} not set")]
    MissingEnv(String),
}

/// Configuration stored in friendgraph.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendgraphConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub rules: RuleSettings,
    #[serde(default)]
    pub media: MediaSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_redis_url(),
            prefix: default_prefix(),
            service: default_service(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

fn default_prefix() -> String {
    "friendgraph".to_string()
}

fn default_service() -> String {
    "social".to_string()
}

/// Input rules enforced by the engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSettings {
    #[serde(default = "default_min_post_length")]
    pub min_post_length: usize,
    #[serde(default = "default_min_name_length")]
    pub min_name_length: usize,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            min_post_length: default_min_post_length(),
            min_name_length: default_min_name_length(),
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_min_post_length() -> usize {
    3
}

fn default_min_name_length() -> usize {
    3
}

fn default_min_password_length() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSettings {
    #[serde(default = "default_media_directory")]
    pub directory: String,
    #[serde(default = "default_public_base")]
    pub public_base: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            directory: default_media_directory(),
            public_base: default_public_base(),
        }
    }
}

fn default_media_directory() -> String {
    "uploads".to_string()
}

fn default_public_base() -> String {
    "/uploads".to_string()
}

impl FriendgraphConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the file at `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the Redis URL, expanding environment variables
    pub fn redis_url(&self) -> Result<String, ConfigError> {
        expand_env(&self.store.url)
    }
}

/// Expands a whole-value `${VAR}` reference; anything else is returned as is.
pub fn expand_env(value: &str) -> Result<String, ConfigError> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).map_err(|_| ConfigError::MissingEnv(var_name.to_string()))
    } else {
        Ok(value.to_string())
    }
}
