//! Request payloads and input validation
//!
//! The param structs give callers a small surface for common choices and
//! turn into the exact JSON bodies the API expects. Validation runs here so
//! that rejected input never reaches the network.

use serde::Serialize;
use thiserror::Error;

use crate::config::DatabaseCredentials;
use crate::models::InstanceSize;

/// Longest project name accepted
pub const MAX_PROJECT_NAME_LEN: usize = 20;

/// Paid-tier disk size bounds, in GB
pub const MIN_STORAGE_GB: u32 = 1;
pub const MAX_STORAGE_GB: u32 = 50;

const CLUSTER_TYPE_REPLICA_SET: &str = "REPLICASET";
const ELECTABLE_NODE_COUNT: u8 = 3;
const REGION_PRIORITY: u8 = 7;
const ADMIN_DATABASE: &str = "admin";
const ADMIN_ROLE: &str = "atlasAdmin";

/// Why a project name was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectNameError {
    #[error("Project name cannot be empty")]
    Empty,
    #[error("Project name cannot exceed 20 characters")]
    TooLong,
    #[error("Project name must contain only English characters and numbers")]
    InvalidCharacters,
}

/// Why a storage size was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageSizeError {
    #[error("Storage size must be a valid integer")]
    NotAnInteger(String),
    #[error("Storage size must be between 1 and 50 GB")]
    OutOfRange(i64),
}

/// Check a project name: non-empty, at most 20 characters, ASCII letters and
/// digits only.
pub fn validate_project_name(name: &str) -> Result<(), ProjectNameError> {
    if name.is_empty() {
        return Err(ProjectNameError::Empty);
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(ProjectNameError::TooLong);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProjectNameError::InvalidCharacters);
    }
    Ok(())
}

/// Resolve the paid-tier disk size.
///
/// An explicit value must parse as an integer in `[1, 50]`; without one the
/// instance size picks the default.
pub fn resolve_storage_size(
    instance_size: InstanceSize,
    requested: Option<&str>,
) -> Result<u32, StorageSizeError> {
    let Some(raw) = requested else {
        return Ok(instance_size.default_storage_gb());
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| StorageSizeError::NotAnInteger(raw.to_string()))?;

    if value < i64::from(MIN_STORAGE_GB) || value > i64::from(MAX_STORAGE_GB) {
        return Err(StorageSizeError::OutOfRange(value));
    }
    Ok(value as u32)
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCreateRequest {
    pub name: String,
    pub cluster_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_enabled: Option<bool>,
    pub replication_specs: Vec<ReplicationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationSpec {
    pub region_configs: Vec<RegionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionConfig {
    pub electable_specs: HardwareSpec,
    pub priority: u8,
    pub region_name: String,
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_provider_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<String>,
    pub instance_size: String,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<u32>,
    pub node_count: u8,
}

impl ClusterCreateRequest {
    /// The single region config of the first replication spec
    pub fn primary_region(&self) -> Option<&RegionConfig> {
        self.replication_specs
            .first()
            .and_then(|spec| spec.region_configs.first())
    }

    /// Provider-qualified region (`aws-us-east-1`) used by the fallback
    /// connection string
    pub fn provider_region(&self) -> Option<String> {
        let region = self.primary_region()?;
        let provider = region
            .backing_provider_name
            .as_deref()
            .unwrap_or(&region.provider_name);
        Some(provider_region(provider, &region.region_name))
    }
}

/// `("AWS", "US_EAST_1")` -> `"aws-us-east-1"`
pub fn provider_region(provider: &str, region_name: &str) -> String {
    format!(
        "{}-{}",
        provider.to_ascii_lowercase(),
        region_name.to_ascii_lowercase().replace('_', "-")
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUserRequest {
    pub database_name: String,
    pub password: String,
    pub roles: Vec<DatabaseRole>,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRole {
    pub database_name: String,
    pub role_name: String,
}

impl DatabaseUserRequest {
    /// Administrative user with `atlasAdmin` on the `admin` database
    pub fn admin(credentials: &DatabaseCredentials) -> Self {
        Self {
            database_name: ADMIN_DATABASE.to_string(),
            password: credentials.password.clone(),
            roles: vec![DatabaseRole {
                database_name: ADMIN_DATABASE.to_string(),
                role_name: ADMIN_ROLE.to_string(),
            }],
            username: credentials.username.clone(),
        }
    }
}

// =============================================================================
// Params
// =============================================================================

/// Parameters for a free-tier (M0) cluster
///
/// # Example
///
/// ```rust
/// use atlasctl_core::params::FreeClusterParams;
///
/// let request = FreeClusterParams::new("sandbox").into_request();
/// assert_eq!(request.provider_region().as_deref(), Some("aws-us-east-1"));
/// ```
#[derive(Debug, Clone)]
pub struct FreeClusterParams {
    pub name: String,
    /// Region name in API form, e.g. `US_EAST_1`
    pub region_name: String,
    /// Cloud provider backing the shared tenant
    pub backing_provider: String,
}

impl FreeClusterParams {
    pub const DEFAULT_REGION: &'static str = "US_EAST_1";
    pub const DEFAULT_PROVIDER: &'static str = "AWS";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region_name: Self::DEFAULT_REGION.to_string(),
            backing_provider: Self::DEFAULT_PROVIDER.to_string(),
        }
    }

    #[must_use]
    pub fn with_region(mut self, region_name: impl Into<String>) -> Self {
        self.region_name = region_name.into();
        self
    }

    #[must_use]
    pub fn into_request(self) -> ClusterCreateRequest {
        ClusterCreateRequest {
            name: self.name,
            cluster_type: CLUSTER_TYPE_REPLICA_SET.to_string(),
            backup_enabled: None,
            replication_specs: vec![ReplicationSpec {
                region_configs: vec![RegionConfig {
                    electable_specs: HardwareSpec {
                        ebs_volume_type: Some("STANDARD".to_string()),
                        instance_size: "M0".to_string(),
                        disk_size_gb: None,
                        node_count: ELECTABLE_NODE_COUNT,
                    },
                    priority: REGION_PRIORITY,
                    region_name: self.region_name,
                    provider_name: "TENANT".to_string(),
                    backing_provider_name: Some(self.backing_provider),
                }],
            }],
        }
    }
}

/// Parameters for a paid-tier (dedicated) cluster
///
/// The storage size is kept in its raw form until [`into_request`] so that
/// a bad value is reported as a validation error.
///
/// [`into_request`]: PaidClusterParams::into_request
#[derive(Debug, Clone)]
pub struct PaidClusterParams {
    pub name: String,
    pub instance_size: InstanceSize,
    pub storage_size: Option<String>,
    pub region_name: String,
    pub provider: String,
}

impl PaidClusterParams {
    pub const DEFAULT_REGION: &'static str = "CA_CENTRAL_1";
    pub const DEFAULT_PROVIDER: &'static str = "AWS";

    #[must_use]
    pub fn new(name: impl Into<String>, instance_size: InstanceSize) -> Self {
        Self {
            name: name.into(),
            instance_size,
            storage_size: None,
            region_name: Self::DEFAULT_REGION.to_string(),
            provider: Self::DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Requested disk size in GB, validated later
    #[must_use]
    pub fn with_storage_size(mut self, storage_size: impl Into<String>) -> Self {
        self.storage_size = Some(storage_size.into());
        self
    }

    #[must_use]
    pub fn with_region(mut self, region_name: impl Into<String>) -> Self {
        self.region_name = region_name.into();
        self
    }

    pub fn into_request(self) -> Result<ClusterCreateRequest, StorageSizeError> {
        let disk_size_gb = resolve_storage_size(self.instance_size, self.storage_size.as_deref())?;

        Ok(ClusterCreateRequest {
            name: self.name,
            cluster_type: CLUSTER_TYPE_REPLICA_SET.to_string(),
            backup_enabled: Some(false),
            replication_specs: vec![ReplicationSpec {
                region_configs: vec![RegionConfig {
                    electable_specs: HardwareSpec {
                        ebs_volume_type: None,
                        instance_size: self.instance_size.to_string(),
                        disk_size_gb: Some(disk_size_gb),
                        node_count: ELECTABLE_NODE_COUNT,
                    },
                    priority: REGION_PRIORITY,
                    region_name: self.region_name,
                    provider_name: self.provider,
                    backing_provider_name: None,
                }],
            }],
        })
    }
}
