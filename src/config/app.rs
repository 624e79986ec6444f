// src/config/app.rs
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, STORE_DB_ENV};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_keys")]
    pub keys: Keys,
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_features")]
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Keys {
    /// Name of the environment variable holding the base64 master key
    #[serde(default = "default_master_key_env")]
    pub master_key_env: String,
    /// Inline master key, only honoured with `features.use_dev_keys`
    #[serde(default)]
    pub master_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    #[serde(default = "default_store_db")]
    pub store_db: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub use_dev_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: default_keys(),
            paths: default_paths(),
            features: default_features(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Read the file named by `EVK_CONFIG`, or built-in defaults when absent
    pub fn from_env() -> CoreResult<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut conf = if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&content)?
        } else {
            warn!(path = %config_path, "config file not found, using built-in defaults");
            Config::default()
        };

        if let Ok(db) = std::env::var(STORE_DB_ENV) {
            conf.paths.store_db = db;
        }

        Ok(conf)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config, loaded once per process
pub fn load() -> CoreResult<&'static Config> {
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }
    let conf = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| conf))
}
