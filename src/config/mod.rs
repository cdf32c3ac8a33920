mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `CONFIG_PATH` (or `config.yaml`) and applies
/// the `MODEL_PATH` override.
pub async fn load() -> Result<Config> {
    let mut config = load_from(env::var("CONFIG_PATH").ok()).await?;

    if let Ok(model_path) = env::var("MODEL_PATH") {
        config.model.cache_dir = model_path;
    }

    Ok(config)
}

/// An explicitly configured path must exist. Without one, a missing
/// `config.yaml` falls back to the built-in defaults so the service can start
/// with no flags at all.
pub async fn load_from(explicit_path: Option<String>) -> Result<Config> {
    let config_path = match explicit_path {
        Some(path) => {
            if !file_exists(&path).await {
                return Err(Error::config(format!("Config file not found: {}", path)));
            }
            path
        }
        None => {
            if !file_exists(DEFAULT_CONFIG_PATH).await {
                debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                return Ok(Config::default());
            }
            DEFAULT_CONFIG_PATH.to_string()
        }
    };

    debug!("Loading configuration from: {}", config_path);
    let config_str = tokio::fs::read_to_string(&config_path).await?;
    parse(&config_str)
}

async fn file_exists(path: &str) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Parses a YAML document; an empty document yields the defaults.
pub fn parse(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}
