//! Configuration file loading and parsing
//!
//! Loads configuration from RON files found in standard locations, then
//! applies environment overrides and validates the result.

use super::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Standard config file names to search for
const CONFIG_FILENAMES: &[&str] = &["worksheets.ron", ".worksheets/config.ron"];

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "WORKSHEETS_CONFIG_PATH";

/// Overrides `upstream.base_url`
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Overrides `server.listen_addr`
pub const LISTEN_ADDR_ENV: &str = "WORKSHEETS_LISTEN_ADDR";

/// Load configuration from a specific file path
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_ron(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration with automatic file discovery
///
/// Searches for config files in the following locations (in order):
/// 1. Path specified in WORKSHEETS_CONFIG_PATH environment variable
/// 2. worksheets.ron in current directory
/// 3. .worksheets/config.ron relative to current directory
///
/// If no config file is found, the defaults are used. Environment overrides
/// are applied afterwards and the final configuration is validated.
pub fn load_with_discovery() -> Result<Config> {
    let config = discover()?;
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    config
        .validate()
        .map_err(|err| anyhow::anyhow!("Invalid configuration: {}", err))?;

    Ok(config)
}

fn discover() -> Result<Config> {
    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            tracing::info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_file(&path);
        } else {
            tracing::warn!(
                "{} specified but file not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            );
        }
    }

    for filename in CONFIG_FILENAMES {
        let path = PathBuf::from(filename);
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            return load_from_file(&path);
        }
    }

    tracing::info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Apply environment overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::info!("Upstream base URL overridden by {}", API_BASE_URL_ENV);
        config.upstream.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    if let Some(addr) = lookup(LISTEN_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
        config.server.listen_addr = addr.trim().to_string();
    }

    config
}

/// Parse RON configuration string
fn parse_ron(content: &str) -> Result<Config> {
    ron::from_str(content).context("Failed to parse RON configuration")
}
