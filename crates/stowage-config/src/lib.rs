//! Configuration for the Stowage front end.
//!
//! TOML file merged with `STOWAGE_`-prefixed environment variables,
//! plus translation into the resolved settings `stowage_core` runs
//! with.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stowage_core::{InventoryConfig, ScannerConfig};

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub scanner: Scanner,
}

/// `[backend]` — where the inventory API lives.
#[derive(Debug, Deserialize, Serialize)]
pub struct Backend {
    /// Base URL including the API prefix (e.g. "http://host:5234/api").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    stowage_core::config::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}

/// `[scanner]` — optional QR/barcode scanner wiring.
#[derive(Debug, Deserialize, Serialize)]
pub struct Scanner {
    /// Device node to read decodes from. Absent means no scanner.
    pub device: Option<PathBuf>,

    /// Settle window in milliseconds before a decode is reported.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            device: None,
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_settle_ms() -> u64 {
    300
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("app", "stowage", "stowage").map_or_else(
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
    p.push("stowage");
    p
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the full `Config` from file + environment.
///
/// Environment variables use a double-underscore separator, e.g.
/// `STOWAGE_BACKEND__BASE_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load from an explicit path (tests and `--config` overrides).
pub fn load_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOWAGE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

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

// ── Translation into resolved core settings ─────────────────────────

impl Config {
    pub fn inventory(&self) -> Result<InventoryConfig, ConfigError> {
        let base_url: url::Url =
            self.backend
                .base_url
                .parse()
                .map_err(|_| ConfigError::Validation {
                    field: "backend.base_url".into(),
                    reason: format!("invalid URL: {}", self.backend.base_url),
                })?;

        Ok(InventoryConfig {
            base_url,
            timeout: Duration::from_secs(self.backend.timeout),
        })
    }

    pub fn scanner(&self) -> ScannerConfig {
        ScannerConfig {
            device: self.scanner.device.clone(),
            settle: Duration::from_millis(self.scanner.settle_ms),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_translate_into_core_settings() {
        let cfg = Config::default();
        let inventory = cfg.inventory().unwrap();
        assert_eq!(inventory.base_url.as_str(), "http://localhost:5234/api");
        assert_eq!(inventory.timeout, Duration::from_secs(30));

        let scanner = cfg.scanner();
        assert!(scanner.device.is_none());
        assert_eq!(scanner.settle, Duration::from_millis(300));
    }

    #[test]
    fn file_and_env_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "stowage.toml",
                r#"
                [backend]
                base_url = "http://inventory.lan:5234/api"

                [scanner]
                device = "/dev/hidraw0"
                settle_ms = 150
                "#,
            )?;
            jail.set_env("STOWAGE_BACKEND__TIMEOUT", "5");

            let cfg = load_from(std::path::Path::new("stowage.toml")).unwrap();
            assert_eq!(cfg.backend.base_url, "http://inventory.lan:5234/api");
            assert_eq!(cfg.backend.timeout, 5);
            assert_eq!(
                cfg.scanner.device.as_deref(),
                Some(std::path::Path::new("/dev/hidraw0"))
            );
            assert_eq!(cfg.scanner.settle_ms, 150);
            Ok(())
        });
    }

    #[test]
    fn invalid_base_url_is_a_validation_error() {
        let cfg = Config {
            backend: Backend {
                base_url: "not a url".into(),
                timeout: 30,
            },
            scanner: Scanner::default(),
        };
        assert!(matches!(
            cfg.inventory(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
