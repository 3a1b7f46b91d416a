//! Unified error handling for atlasctl-core
//!
//! Every operation returns [`Result`]. The variants follow the failure
//! classes a provisioning run can hit: bad configuration, rejected input,
//! a non-success API response, a transport failure, or an exhausted polling
//! budget.
//!
//! # Example
//!
//! ```rust
//! use atlasctl_core::CoreError;
//!
//! fn describe(err: &CoreError) -> &'static str {
//!     if err.is_timeout() {
//!         "cluster did not become ready in time"
//!     } else if err.is_conflict() {
//!         "resource already exists"
//!     } else {
//!         "request failed"
//!     }
//! }
//!
//! let err = CoreError::ClusterTimeout { cluster: "demo".to_string(), attempts: 30 };
//! assert_eq!(describe(&err), "cluster did not become ready in time");
//! ```

use thiserror::Error;

use crate::config::ConfigError;
use crate::params::{ProjectNameError, StorageSizeError};

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing or malformed configuration, checked before any request
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidProjectName(#[from] ProjectNameError),

    #[error(transparent)]
    InvalidStorageSize(#[from] StorageSizeError),

    /// The API answered with an unexpected status code
    #[error("{context}. Status code: {status}, Response: {body}")]
    Api {
        context: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response
    #[error("Exception occurred while {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered successfully but the body could not be understood
    #[error("Invalid response while {context}: {message}")]
    InvalidResponse { context: String, message: String },

    #[error("No organizations found for this user")]
    NoOrganizations,

    /// Polling budget exhausted before the cluster reached IDLE
    #[error("Timeout waiting for cluster '{cluster}' to be ready after {attempts} status checks")]
    ClusterTimeout { cluster: String, attempts: u32 },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub(crate) fn api(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        CoreError::Api {
            context: context.into(),
            status,
            body: body.into(),
        }
    }

    pub(crate) fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        CoreError::Transport {
            context: context.into(),
            source,
        }
    }

    /// HTTP status code of a remote rejection
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this is a conflict error (409)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Returns true if the polling budget ran out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::ClusterTimeout { .. })
    }

    /// Returns true if the caller's input was rejected before any request
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidProjectName(_) | CoreError::InvalidStorageSize(_)
        )
    }

    /// Returns true if the failure happened before reaching the API
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Transport { .. })
    }
}
