//! Configuration for the dialdeck console.
//!
//! A small TOML file layered with environment overrides: file values
//! beat compiled defaults, `DIALDECK_*` variables beat the file. The
//! console runs fine with no config file at all.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dialdeck_api::TransportConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL (the `/api/v1` prefix is appended internally).
    #[serde(default = "default_server")]
    pub server: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Reconciliation cadence in seconds, for both polling scopes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Call-list page size.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            page_size: default_page_size(),
        }
    }
}

fn default_server() -> String {
    "http://localhost:8080".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    15
}
fn default_page_size() -> usize {
    50
}

impl Config {
    /// Parse and validate the configured server URL.
    pub fn server_url(&self) -> Result<url::Url, ConfigError> {
        self.server.parse().map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", self.server),
        })
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "dialdeck", "dialdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dialdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from an explicit file path plus environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DIALDECK_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_stand_alone() {
        let cfg = Config::default();
        assert_eq!(cfg.server, "http://localhost:8080");
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.poll_interval, 15);
        assert_eq!(cfg.page_size, 50);
        assert!(cfg.server_url().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = \"http://dialer.internal:9000\"\npage_size = 25\n")
            .expect("write config");

        let cfg = load_config_from(&path).expect("load");
        assert_eq!(cfg.server, "http://dialer.internal:9000");
        assert_eq!(cfg.page_size, 25);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.poll_interval, 15);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg.server, Config::default().server);
    }

    #[test]
    fn bad_server_url_is_a_validation_error() {
        let cfg = Config {
            server: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            cfg.server_url(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config {
            server: "http://example.com".into(),
            timeout: 10,
            poll_interval: 5,
            page_size: 20,
        };
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back.server, cfg.server);
        assert_eq!(back.poll_interval, 5);
    }
}
