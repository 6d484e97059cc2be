//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API origin, which storage backend holds the session, the request
//! timeout and an optional log directory.
//!
//! Configuration is stored at `~/.config/debtdesk/config.json`, and any
//! `DEBTDESK_*` environment variable overrides the matching field.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::StorageBackend;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "debtdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default HTTP request timeout in seconds. 0 disables the timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "DEBTDESK_API_URL";
pub const ENV_STORAGE: &str = "DEBTDESK_STORAGE";
pub const ENV_TIMEOUT_SECS: &str = "DEBTDESK_TIMEOUT_SECS";

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            storage: StorageBackend::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Overlay `DEBTDESK_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Unparseable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_STORAGE) {
            match StorageBackend::parse(&raw) {
                Some(backend) => self.storage = backend,
                None => warn!(value = %raw, "Unknown {}, keeping {:?}", ENV_STORAGE, self.storage),
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(e) => warn!(value = %raw, error = %e, "Invalid {}, ignoring", ENV_TIMEOUT_SECS),
            }
        }
    }

    pub fn api_base_url(&self) -> Result<&str> {
        self.api_base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "API base URL is not configured. Set {} or api_base_url in {}",
                    ENV_API_URL,
                    CONFIG_FILE
                )
            })
    }

    /// None means requests may wait forever.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.api_base_url().is_err());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config =
            serde_json::from_str(r#"{"api_base_url":"https://api.example.com"}"#).unwrap();
        assert_eq!(config.api_base_url().unwrap(), "https://api.example.com");
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

        let config: Config =
            serde_json::from_str(r#"{"api_base_url":null,"storage":"keyring"}"#).unwrap();
        assert_eq!(config.storage, StorageBackend::Keyring);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (ENV_API_URL, " http://localhost:8000/api "),
            (ENV_STORAGE, "memory"),
            (ENV_TIMEOUT_SECS, "0"),
        ]));
        assert_eq!(config.api_base_url().unwrap(), "http://localhost:8000/api");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = Config {
            api_base_url: Some("https://api.example.com".to_string()),
            ..Default::default()
        };
        config.apply_overrides(lookup(&[
            (ENV_API_URL, ""),
            (ENV_STORAGE, "cookies"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert_eq!(config.api_base_url().unwrap(), "https://api.example.com");
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
