//! Configuration file loading
//!
//! The service resolves each setting with CLI → environment → TOML →
//! compiled-default priority; this module provides the TOML tier and the
//! platform config path.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents
///
/// All fields are optional; anything absent falls back to the next
/// resolution tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// YouTube Data API key
    pub api_key: Option<String>,
    /// Listen address, e.g. "127.0.0.1:8080"
    pub listen_addr: Option<String>,
    /// Ceiling on comments fetched per request
    pub max_results: Option<usize>,
    /// Path to a labeled sentiment corpus (CSV)
    pub dataset_path: Option<PathBuf>,
}

/// Default configuration file path: `~/.config/vcsa/config.toml`
/// (platform-appropriate config directory via `dirs`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vcsa").join("config.toml"))
}

/// Load a TOML config file
///
/// A missing file is not an error; it yields the all-defaults config so the
/// remaining tiers apply.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}
