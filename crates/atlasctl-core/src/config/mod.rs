//! Configuration and credential resolution for atlasctl
//!
//! Settings may come from a TOML file, a `.env` file, or the process
//! environment. The result is a single [`Config`] value handed to every
//! operation, from which credentials and polling budgets are derived.

// Allow nested config module - this is intentional for the config subsystem
#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

// Re-export main types for convenience
pub use config::{ApiConfig, Config, DatabaseUserConfig, PollingConfig};
pub use credential::{ApiCredentials, DatabaseCredentials};
pub use error::{ConfigError, Result};
