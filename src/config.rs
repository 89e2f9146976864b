//! Top-level application configuration.
//!
//! Configuration is stored in the user's config directory (`config.yaml`) and
//! includes the base URL of the bugs API, the static API credential, and the
//! remote operation timeout. Environment variables take precedence over the
//! file so scripted runs can point at a different collaborator.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BugboardError, Result};

/// Base URL the client ships with when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://bug-report-system-server.herokuapp.com";

/// Static credential sent in the `Authorization` header. The bugs API uses a
/// fixed token; there is no refresh flow.
pub const DEFAULT_API_TOKEN: &str = "code.hub.ng5.token";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_remote_timeout() -> u64 {
    30
}

/// Main configuration structure
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the bugs API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Authorization token; falls back to the built-in credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            remote_timeout: default_remote_timeout(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("remote_timeout", &self.remote_timeout)
            .finish()
    }
}

impl Config {
    /// Path to the configuration file.
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("", "", "bugboard") {
            return dirs.config_dir().join("config.yaml");
        }
        PathBuf::from(".bugboard").join("config.yaml")
    }

    /// Load configuration from disk, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Persist configuration to disk, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(self)
            .map_err(|e| BugboardError::Config(format!("failed to serialize config: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Base URL of the bugs API. `BUGBOARD_API_URL` overrides the file.
    pub fn api_url(&self) -> String {
        if let Ok(url) = env::var("BUGBOARD_API_URL")
            && !url.is_empty()
        {
            return url;
        }
        self.api_url.clone()
    }

    /// Authorization token. `BUGBOARD_API_TOKEN` overrides the file, which in
    /// turn overrides the built-in static credential.
    pub fn api_token(&self) -> String {
        if let Ok(token) = env::var("BUGBOARD_API_TOKEN")
            && !token.is_empty()
        {
            return token;
        }
        self.api_token
            .clone()
            .unwrap_or_else(|| DEFAULT_API_TOKEN.to_string())
    }

    /// Set the API base URL
    pub fn set_api_url(&mut self, url: String) {
        self.api_url = url;
    }

    /// Set the API token
    pub fn set_api_token(&mut self, token: String) {
        self.api_token = Some(token);
    }

    /// Set the remote operation timeout in seconds
    pub fn set_remote_timeout(&mut self, seconds: u64) {
        self.remote_timeout = seconds;
    }

    /// Remote operation timeout as a Duration
    pub fn remote_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.remote_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        unsafe {
            env::remove_var("BUGBOARD_API_URL");
            env::remove_var("BUGBOARD_API_TOKEN");
        }
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.api_token(), DEFAULT_API_TOKEN);
        assert_eq!(config.remote_timeout().as_secs(), 30);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.set_api_url("https://bugs.example.com".to_string());
        config.set_api_token("file-token".to_string());

        unsafe {
            env::set_var("BUGBOARD_API_URL", "https://override.example.com");
            env::set_var("BUGBOARD_API_TOKEN", "env-token");
        }
        assert_eq!(config.api_url(), "https://override.example.com");
        assert_eq!(config.api_token(), "env-token");

        unsafe {
            env::remove_var("BUGBOARD_API_URL");
            env::remove_var("BUGBOARD_API_TOKEN");
        }
        assert_eq!(config.api_url(), "https://bugs.example.com");
        assert_eq!(config.api_token(), "file-token");
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = Config::default();
        config.set_api_token("secret".to_string());
        config.set_remote_timeout(5);

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.api_token, Some("secret".to_string()));
        assert_eq!(parsed.remote_timeout, 5);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.set_api_token("super-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: Config = serde_yaml_ng::from_str("api_url: https://x.test\n").unwrap();
        assert_eq!(parsed.api_url, "https://x.test");
        assert_eq!(parsed.api_token, None);
        assert_eq!(parsed.remote_timeout, 30);
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.set_api_url("https://bugs.example.com".to_string());
        config.set_remote_timeout(7);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url, "https://bugs.example.com");
        assert_eq!(loaded.remote_timeout, 7);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
    }
}
