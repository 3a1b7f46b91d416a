//! # atlasctl-core
//!
//! Shared library behind the `atlasctl` binary: configuration loading, the
//! digest-authenticated API transport, input validation, and the
//! provisioning workflows (projects, free and paid clusters).
//!
//! The CLI only parses arguments and renders results; everything that talks
//! to the API lives here so it can be exercised directly in tests.
//!
//! ## Layout
//!
//! - [`config`] - TOML file, `.env` and environment layering
//! - [`client`] - [`AtlasClient`], HTTP digest auth and versioned media type
//! - [`params`] - validators and request payloads
//! - [`progress`] - [`ClusterPoller`] and progress events
//! - [`connection_string`] - resolution and masking
//! - [`workflows`] - multi-step operations
//!
//! ## Example
//!
//! ```rust,ignore
//! use atlasctl_core::{AtlasClient, Config};
//! use atlasctl_core::workflows::list_organizations;
//!
//! let config = Config::resolve(None, &std::env::current_dir()?)?;
//! let client = AtlasClient::from_config(&config)?;
//! for org in list_organizations(&client).await? {
//!     println!("ID: {}, Name: {}", org.id, org.name);
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection_string;
pub mod error;
pub mod models;
pub mod params;
pub mod progress;
pub mod workflows;

pub use client::{ApiResponse, AtlasClient};
pub use config::{ApiCredentials, Config, ConfigError, DatabaseCredentials};
pub use connection_string::{ConnectionSource, ConnectionString, mask_connection_string};
pub use error::{CoreError, Result};
pub use models::{ClusterState, ClusterTier, InstanceSize, Organization, Project};
pub use params::{FreeClusterParams, PaidClusterParams};
pub use progress::{ClusterPoller, PollSettings, PollStep, ProgressCallback, ProgressEvent};
pub use workflows::{ProvisionedCluster, UserOutcome};
