//! Configuration resolution for vcsa-server
//!
//! Each setting resolves with command line → environment → TOML → default
//! priority. clap folds the environment tier into the CLI tier via its
//! `env` attribute, so resolution below sees two layers: CLI/env and TOML.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use vcsa_common::config::{default_config_path, load_toml_config, TomlConfig};
use vcsa_common::{Error, Result};

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Default ceiling on comments fetched per request
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Command line arguments
#[derive(Debug, Default, Parser)]
#[command(
    name = "vcsa-server",
    version,
    about = "Video Comment Sentiment Analyzer service"
)]
pub struct Cli {
    /// YouTube Data API key
    #[arg(long, env = "VCSA_API_KEY")]
    pub api_key: Option<String>,

    /// Listen address, e.g. 127.0.0.1:8080
    #[arg(long, env = "VCSA_LISTEN_ADDR")]
    pub listen_addr: Option<SocketAddr>,

    /// Ceiling on comments fetched per request
    #[arg(long, env = "VCSA_MAX_RESULTS")]
    pub max_results: Option<usize>,

    /// Path to a labeled sentiment corpus (CSV); embedded corpus when unset
    #[arg(long, env = "VCSA_DATASET")]
    pub dataset_path: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(long, env = "VCSA_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// YouTube Data API key
    pub api_key: String,
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Ceiling on comments fetched per request
    pub max_results: usize,
    /// Sentiment corpus path (None = embedded corpus)
    pub dataset_path: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from CLI/env arguments and the TOML file
    pub fn resolve(cli: Cli) -> Result<Self> {
        let toml_config = match cli.config_file.clone().or_else(default_config_path) {
            Some(path) => load_toml_config(&path)?,
            None => TomlConfig::default(),
        };

        let api_key = resolve_api_key(cli.api_key, toml_config.api_key)?;

        let listen_addr = match (cli.listen_addr, toml_config.listen_addr) {
            (Some(addr), _) => addr,
            (None, Some(s)) => s
                .parse()
                .map_err(|e| Error::Config(format!("Invalid listen_addr '{}': {}", s, e)))?,
            (None, None) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address parses"),
        };

        let max_results = cli
            .max_results
            .or(toml_config.max_results)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let dataset_path = cli.dataset_path.or(toml_config.dataset_path);

        Ok(Self {
            api_key,
            listen_addr,
            max_results,
            dataset_path,
        })
    }
}

/// Resolve the YouTube API key from CLI/env and TOML tiers
fn resolve_api_key(cli_key: Option<String>, toml_key: Option<String>) -> Result<String> {
    let mut sources = Vec::new();
    if cli_key.as_deref().is_some_and(is_valid_key) {
        sources.push("command line/environment");
    }
    if toml_key.as_deref().is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "YouTube API key found in multiple sources: {}. Using command line/environment (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = cli_key {
        if is_valid_key(&key) {
            info!("YouTube API key loaded from command line/environment");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(&key) {
            info!("YouTube API key loaded from TOML config");
            return Ok(key);
        }
    }

    Err(Error::Config(
        "YouTube API key not configured. Please configure using one of:\n\
         1. Command line: vcsa-server --api-key=your-key-here\n\
         2. Environment: VCSA_API_KEY=your-key-here\n\
         3. TOML config: ~/.config/vcsa/config.toml (api_key = \"your-key\")\n\
         \n\
         Obtain an API key at: https://console.cloud.google.com/apis/credentials"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cli with config_file pinned to a path that cannot exist, so a real
    /// ~/.config/vcsa/config.toml never leaks into tests
    fn cli_without_toml() -> Cli {
        Cli {
            config_file: Some(PathBuf::from("/nonexistent/vcsa-test/config.toml")),
            ..Cli::default()
        }
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Config::resolve(cli_without_toml()).unwrap_err();
        assert!(err.to_string().contains("API key not configured"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let cli = Cli {
            api_key: Some("   ".to_string()),
            ..cli_without_toml()
        };
        assert!(Config::resolve(cli).is_err());
    }

    #[test]
    fn defaults_apply_when_only_key_is_given() {
        let cli = Cli {
            api_key: Some("k".to_string()),
            ..cli_without_toml()
        };
        let config = Config::resolve(cli).unwrap();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert!(config.dataset_path.is_none());
    }

    #[test]
    fn toml_tier_fills_missing_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_key = \"from-toml\"\nlisten_addr = \"0.0.0.0:9000\"\nmax_results = 250\n",
        )
        .unwrap();

        let cli = Cli {
            config_file: Some(path),
            ..Cli::default()
        };
        let config = Config::resolve(cli).unwrap();
        assert_eq!(config.api_key, "from-toml");
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.max_results, 250);
    }

    #[test]
    fn cli_tier_overrides_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"from-toml\"\nmax_results = 250\n").unwrap();

        let cli = Cli {
            api_key: Some("from-cli".to_string()),
            max_results: Some(10),
            config_file: Some(path),
            ..Cli::default()
        };
        let config = Config::resolve(cli).unwrap();
        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn invalid_toml_listen_addr_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"k\"\nlisten_addr = \"not-an-addr\"\n").unwrap();

        let cli = Cli {
            config_file: Some(path),
            ..Cli::default()
        };
        assert!(Config::resolve(cli).is_err());
    }
}
