//! Error types for configuration operations

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error(
        "API keys not found. Please set ATLAS_PUBLIC_KEY and ATLAS_PRIVATE_KEY in your environment or .env file"
    )]
    MissingApiKeys,

    #[error(
        "Database user credentials not found. Please set DB_USER and DB_PASSWORD in your environment or .env file"
    )]
    MissingDatabaseUser,

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load .env file: {0}")]
    DotEnv(String),

    #[error("Failed to determine config directory")]
    ConfigDirError,
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
