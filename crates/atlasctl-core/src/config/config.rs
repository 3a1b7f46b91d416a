//! Configuration management for atlasctl
//!
//! Settings are merged from, lowest to highest precedence: built-in defaults,
//! an optional TOML config file, a `.env` file, and the process environment.
//! The merged [`Config`] is built once at startup and passed by reference.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::credential::{ApiCredentials, DatabaseCredentials};
use super::error::{ConfigError, Result};
use crate::models::ClusterTier;
use crate::progress::PollSettings;

/// Control-plane API base URL
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v2";

/// Versioned media type sent in the `Accept` header of every request
pub const DEFAULT_API_VERSION: &str = "2025-02-19";

pub const ENV_PUBLIC_KEY: &str = "ATLAS_PUBLIC_KEY";
pub const ENV_PRIVATE_KEY: &str = "ATLAS_PRIVATE_KEY";
pub const ENV_BASE_URL: &str = "ATLAS_BASE_URL";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_POLL_INTERVAL: &str = "ATLASCTL_POLL_INTERVAL";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Control-plane API access
    #[serde(default)]
    pub api: ApiConfig,
    /// Administrative database user created on new clusters
    #[serde(default)]
    pub database_user: DatabaseUserConfig,
    /// Cluster readiness polling overrides
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout in seconds; unset means no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            private_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Serialize, Deserialize, Default, Clone)]
pub struct DatabaseUserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for DatabaseUserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseUserConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Seconds between cluster status checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_max_attempts: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Treat unset and empty values the same way
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Platform-specific config file location
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "atlasctl", "atlasctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Build the effective configuration.
    ///
    /// Reads `config_file` (or the default location), then layers the `.env`
    /// file found in `env_dir` and finally the process environment on top.
    pub fn resolve(config_file: Option<&Path>, env_dir: &Path) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };

        let dotenv = read_dotenv(&env_dir.join(".env"))?;
        config.apply_env_from(|key| dotenv.get(key).cloned())?;
        config.apply_env_from(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Override settings from a key lookup (environment, `.env` map, ...)
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(value) = get(ENV_PUBLIC_KEY) {
            self.api.public_key = Some(value);
        }
        if let Some(value) = get(ENV_PRIVATE_KEY) {
            self.api.private_key = Some(value);
        }
        if let Some(value) = get(ENV_BASE_URL) {
            self.api.base_url = value;
        }
        if let Some(value) = get(ENV_DB_USER) {
            self.database_user.username = Some(value);
        }
        if let Some(value) = get(ENV_DB_PASSWORD) {
            self.database_user.password = Some(value);
        }
        if let Some(value) = get(ENV_POLL_INTERVAL) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: ENV_POLL_INTERVAL.to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            self.polling.interval_secs = Some(secs);
        }

        Ok(())
    }

    /// API key pair, required by every operation
    pub fn api_credentials(&self) -> Result<ApiCredentials> {
        match (
            non_empty(self.api.public_key.clone()),
            non_empty(self.api.private_key.clone()),
        ) {
            (Some(public_key), Some(private_key)) => {
                Ok(ApiCredentials::new(public_key, private_key))
            }
            _ => Err(ConfigError::MissingApiKeys),
        }
    }

    /// Database user credentials, required by the cluster commands
    pub fn database_credentials(&self) -> Result<DatabaseCredentials> {
        match (
            non_empty(self.database_user.username.clone()),
            non_empty(self.database_user.password.clone()),
        ) {
            (Some(username), Some(password)) => Ok(DatabaseCredentials::new(username, password)),
            _ => Err(ConfigError::MissingDatabaseUser),
        }
    }

    /// Polling budget for a tier, with any configured overrides applied
    pub fn poll_settings(&self, tier: ClusterTier) -> PollSettings {
        let mut settings = PollSettings::for_tier(tier);
        if let Some(secs) = self.polling.interval_secs {
            settings.interval = Duration::from_secs(secs);
        }
        let attempts = match tier {
            ClusterTier::Free => self.polling.free_max_attempts,
            ClusterTier::Paid => self.polling.paid_max_attempts,
        };
        if let Some(max_attempts) = attempts {
            settings.max_attempts = max_attempts;
        }
        settings
    }
}

/// Read `KEY=VALUE` pairs from a dotenv file without touching the process
/// environment. A missing file is not an error.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
    };

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| ConfigError::DotEnv(e.to_string()))?;
        values.insert(key, value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.api_version, DEFAULT_API_VERSION);
        assert!(config.api.public_key.is_none());
        assert!(config.polling.interval_secs.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_from(lookup(&[
                (ENV_PUBLIC_KEY, "pub"),
                (ENV_PRIVATE_KEY, "priv"),
                (ENV_BASE_URL, "http://localhost:8080/api"),
                (ENV_DB_USER, "admin"),
                (ENV_DB_PASSWORD, "Password1"),
                (ENV_POLL_INTERVAL, "5"),
            ]))
            .unwrap();

        let api = config.api_credentials().unwrap();
        assert_eq!(api.public_key, "pub");
        assert_eq!(api.private_key, "priv");
        assert_eq!(config.api.base_url, "http://localhost:8080/api");

        let db = config.database_credentials().unwrap();
        assert_eq!(db.username, "admin");
        assert_eq!(db.password, "Password1");
        assert_eq!(config.polling.interval_secs, Some(5));
    }

    #[test]
    fn test_missing_api_keys() {
        let mut config = Config::default();
        config
            .apply_env_from(lookup(&[(ENV_PUBLIC_KEY, "pub")]))
            .unwrap();

        let err = config.api_credentials().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKeys));
        assert!(err.to_string().contains("API keys not found"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let mut config = Config::default();
        config
            .apply_env_from(lookup(&[(ENV_PUBLIC_KEY, ""), (ENV_PRIVATE_KEY, "  ")]))
            .unwrap();
        assert!(config.api_credentials().is_err());
    }

    #[test]
    fn test_missing_database_user() {
        let config = Config::default();
        assert!(matches!(
            config.database_credentials(),
            Err(ConfigError::MissingDatabaseUser)
        ));
    }

    #[test]
    fn test_invalid_poll_interval() {
        let mut config = Config::default();
        let err = config
            .apply_env_from(lookup(&[(ENV_POLL_INTERVAL, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_POLL_INTERVAL));
    }

    #[test]
    fn test_poll_settings_defaults_per_tier() {
        let config = Config::default();
        let free = config.poll_settings(ClusterTier::Free);
        assert_eq!(free.interval, Duration::from_secs(30));
        assert_eq!(free.max_attempts, 30);

        let paid = config.poll_settings(ClusterTier::Paid);
        assert_eq!(paid.interval, Duration::from_secs(30));
        assert_eq!(paid.max_attempts, 60);
    }

    #[test]
    fn test_poll_settings_overrides() {
        let config = Config {
            polling: PollingConfig {
                interval_secs: Some(1),
                free_max_attempts: Some(3),
                paid_max_attempts: None,
            },
            ..Default::default()
        };
        let free = config.poll_settings(ClusterTier::Free);
        assert_eq!(free.interval, Duration::from_secs(1));
        assert_eq!(free.max_attempts, 3);
        assert_eq!(config.poll_settings(ClusterTier::Paid).max_attempts, 60);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::default();
        config
            .apply_env_from(lookup(&[
                (ENV_PRIVATE_KEY, "top-secret"),
                (ENV_DB_PASSWORD, "Password1"),
            ]))
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("Password1"));
    }
}
