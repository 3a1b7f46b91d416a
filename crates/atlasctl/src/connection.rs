//! Connection management for the control-plane API client

use std::path::{Path, PathBuf};

use atlasctl_core::{AtlasClient, ClusterTier, Config, DatabaseCredentials, PollSettings};
use tracing::{debug, info};

use crate::error::{CliError, Result as CliResult};

/// Holds the resolved configuration and builds clients from it
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pub config: Config,
}

impl ConnectionManager {
    /// Resolve configuration from `config_file` (or the default location),
    /// the `.env` file in `env_dir`, and the process environment
    pub fn resolve(config_file: Option<&str>, env_dir: &Path) -> CliResult<Self> {
        let config_path = config_file.map(PathBuf::from);
        match &config_path {
            Some(path) => debug!("Loading config from explicit path: {:?}", path),
            None => debug!("Loading config from default location"),
        }

        let config = Config::resolve(config_path.as_deref(), env_dir)?;
        Ok(Self { config })
    }

    #[cfg(test)]
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Create an authenticated API client
    pub fn create_client(&self) -> CliResult<AtlasClient> {
        // Surface missing keys as a configuration error
        self.config.api_credentials()?;
        info!("Using Atlas API at {}", self.config.api.base_url);
        AtlasClient::from_config(&self.config)
            .map_err(|e| CliError::operation("create API client", e))
    }

    /// Credentials for the admin user created on new clusters
    pub fn database_credentials(&self) -> CliResult<DatabaseCredentials> {
        Ok(self.config.database_credentials()?)
    }

    pub fn poll_settings(&self, tier: ClusterTier) -> PollSettings {
        self.config.poll_settings(tier)
    }
}
