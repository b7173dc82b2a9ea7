//! Configuration file loading.
//!
//! Every field has a default, so a missing file or an empty one is valid.
//! Command-line flags and environment variables override what is loaded here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Base for avatar file names. Defaults to `<url>/uploads`.
    #[serde(default)]
    pub upload_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            upload_url: None,
        }
    }
}

impl ApiConfig {
    pub fn upload_url(&self) -> String {
        match &self.upload_url {
            Some(url) => url.clone(),
            None => format!("{}/uploads", self.url.trim_end_matches('/')),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("profile").join("storage.json"),
        None => PathBuf::from(".profile-storage.json"),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.api.url, "http://localhost:3000");
        assert_eq!(config.api.upload_url(), "http://localhost:3000/uploads");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::parse(
            r#"
            [api]
            url = "https://api.example.com/v1/"
            upload_url = "https://cdn.example.com/avatars"

            [storage]
            token_file = "/tmp/profile.json"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.url, "https://api.example.com/v1/");
        assert_eq!(config.api.upload_url(), "https://cdn.example.com/avatars");
        assert_eq!(config.storage.token_file, PathBuf::from("/tmp/profile.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn derived_upload_url_strips_trailing_slash() {
        let config = Config::parse("[api]\nurl = \"http://h:1/\"\n").unwrap();
        assert_eq!(config.api.upload_url(), "http://h:1/uploads");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = Config::load(Path::new("/nonexistent/profile.toml")).unwrap();
        assert_eq!(config.api.url, "http://localhost:3000");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::parse("[api\nurl=").is_err());
    }
}
