//! Configuration - Jira connection settings
//!
//! Settings come from `<config dir>/config.yaml`, overridden by environment
//! variables. The API token is read but never written back to disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file name inside the config directory
const CONFIG_FILE: &str = "config.yaml";

/// Default timeout for a single remote call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a configuration directory; set JAT_CONFIG_DIR")]
    NoConfigDir,

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Jira connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Site URL, e.g. https://your-domain.atlassian.net
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    /// Account email used for basic auth
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,

    /// API token; only ever read, never saved
    #[serde(skip_serializing)]
    pub api_token: String,

    /// Default project for `jat create`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

/// Toolkit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub jira: JiraConfig,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira: JiraConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Directory holding config.yaml
    ///
    /// `JAT_CONFIG_DIR` wins over the platform config directory.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(dir) = std::env::var_os("JAT_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        directories::ProjectDirs::from("", "", "jira-automation")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load file config and apply environment overrides
    ///
    /// A missing or unreadable file yields defaults; the problem is logged.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Ok(path) => Self::load_file(&path).unwrap_or_else(|e| {
                tracing::warn!("ignoring config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Read a config file; a missing file is not an error
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.timeout_secs == 0 {
            tracing::warn!("timeout_secs must be at least 1; using {}", DEFAULT_TIMEOUT_SECS);
            config.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        Ok(config)
    }

    /// Per-request timeout; a zero setting falls back to the default
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Override fields from environment variables
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("JIRA_URL") {
            self.jira.url = url;
        }
        if let Some(email) = get("JIRA_EMAIL") {
            self.jira.email = email;
        }
        if let Some(token) = get("JIRA_API_TOKEN") {
            self.jira.api_token = token;
        }
        if let Some(project) = get("JIRA_PROJECT_KEY") {
            self.jira.project_key = Some(project);
        }
        if let Some(timeout) = get("JAT_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(0) => tracing::warn!(
                    "JAT_TIMEOUT_SECS must be at least 1; keeping {}",
                    self.timeout_secs
                ),
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("JAT_TIMEOUT_SECS is not a number: {}", timeout),
            }
        }
    }

    /// Whether url, email and token are all present
    pub fn is_configured(&self) -> bool {
        !self.jira.url.is_empty() && !self.jira.email.is_empty() && !self.jira.api_token.is_empty()
    }

    /// Names of the settings still missing
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.jira.url.is_empty() {
            missing.push("JIRA_URL");
        }
        if self.jira.email.is_empty() {
            missing.push("JIRA_EMAIL");
        }
        if self.jira.api_token.is_empty() {
            missing.push("JIRA_API_TOKEN");
        }
        missing
    }

    /// Write the non-secret settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Write the non-secret settings to the default location
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.is_configured());
        assert_eq!(config.missing(), vec!["JIRA_URL", "JIRA_EMAIL", "JIRA_API_TOKEN"]);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            jira: JiraConfig {
                url: "https://old.atlassian.net".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        config.apply_env(env(&[
            ("JIRA_URL", " https://new.atlassian.net "),
            ("JIRA_EMAIL", "dev@example.com"),
            ("JIRA_API_TOKEN", "secret"),
            ("JAT_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.jira.url, "https://new.atlassian.net");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.is_configured());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.jira.email = "kept@example.com".to_string();
        config.apply_env(env(&[("JIRA_EMAIL", "   "), ("JAT_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.jira.email, "kept@example.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.apply_env(env(&[("JAT_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout_secs, 30);

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "timeout_secs: 0\n").unwrap();
        assert_eq!(Config::load_file(&path).unwrap().timeout_secs, 30);

        config.timeout_secs = 0;
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_omits_token() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.jira.url = "https://x.atlassian.net".to_string();
        config.jira.api_token = "secret".to_string();
        config.jira.project_key = Some("KAN".to_string());
        config.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret"));

        let loaded = Config::load_file(&path).unwrap();
        assert_eq!(loaded.jira.url, "https://x.atlassian.net");
        assert_eq!(loaded.jira.project_key.as_deref(), Some("KAN"));
        assert!(loaded.jira.api_token.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = Config::load_file(&tmp.path().join("absent.yaml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "jira: [not, a, map").unwrap();
        assert!(matches!(
            Config::load_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
