//! # Dashboard Configuration
//!
//! Settings are read from an optional YAML file, by default
//! `<config dir>/payment-retry-dashboard/config.yaml`:
//!
//! ```yaml
//! api_base_url: "http://localhost:8080"
//! request_timeout_secs: 30
//! page_size: 10
//! session_file: "/home/me/.local/share/payment-retry-dashboard/session.json"
//! ```
//!
//! Every key is optional. `PAYMENT_RETRY_API_URL` overrides the file's
//! base URL, and command-line flags override both.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const APP_DIR_NAME: &str = "payment-retry-dashboard";
pub const API_URL_ENV: &str = "PAYMENT_RETRY_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the payment retry REST API
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Page size for every paged listing
    pub page_size: u32,
    /// Where the session token lives; defaults to the platform data dir
    pub session_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            page_size: 10,
            session_file: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `explicit`, or from the default location if
    /// it exists, then apply environment overrides.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml_str(&yaml_content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        debug!("Loaded dashboard config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    pub fn apply_env_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.yaml"))
    }

    /// Session file location, falling back to the working directory when
    /// the platform has no data dir
    pub fn session_path(&self) -> PathBuf {
        if let Some(path) = &self.session_file {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml_str("page_size: 25\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DashboardConfig::from_yaml_str("").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        let session = temp_dir.path().join("session.json");
        fs::write(
            &path,
            format!(
                "api_base_url: \"https://payments.example.com\"\nsession_file: {:?}\n",
                session
            ),
        )
        .unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "https://payments.example.com");
        assert_eq!(config.session_path(), session);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(DashboardConfig::load(Some(&temp_dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = DashboardConfig::default();
        config.apply_env_overrides(Some("http://api.internal:9000".to_string()));
        assert_eq!(config.api_base_url, "http://api.internal:9000");

        config.apply_env_overrides(Some("   ".to_string()));
        assert_eq!(config.api_base_url, "http://api.internal:9000");
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = DashboardConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
