//! Resource types returned by the control-plane API
//!
//! Only the fields atlasctl reads are modeled; everything else in the
//! response is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Paginated list envelope (`{"results": [...], "totalCount": n}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

/// Project (called a "group" by the API)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStrings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_srv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
}

/// Cluster description as returned by `GET /groups/{id}/clusters/{name}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongo_db_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strings: Option<ConnectionStrings>,
}

impl Cluster {
    /// Lifecycle state; a missing `stateName` counts as not ready
    pub fn state(&self) -> ClusterState {
        self.state_name
            .as_deref()
            .map(ClusterState::from)
            .unwrap_or(ClusterState::Unknown(String::new()))
    }

    pub fn standard_srv(&self) -> Option<&str> {
        self.connection_strings
            .as_ref()
            .and_then(|c| c.standard_srv.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Cluster lifecycle state. Only `Idle` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterState {
    Idle,
    Creating,
    Updating,
    Repairing,
    Deleting,
    Unknown(String),
}

impl ClusterState {
    /// The ready sentinel
    pub fn is_ready(&self) -> bool {
        matches!(self, ClusterState::Idle)
    }
}

impl From<&str> for ClusterState {
    fn from(value: &str) -> Self {
        match value {
            "IDLE" => ClusterState::Idle,
            "CREATING" => ClusterState::Creating,
            "UPDATING" => ClusterState::Updating,
            "REPAIRING" => ClusterState::Repairing,
            "DELETING" => ClusterState::Deleting,
            other => ClusterState::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterState::Idle => write!(f, "IDLE"),
            ClusterState::Creating => write!(f, "CREATING"),
            ClusterState::Updating => write!(f, "UPDATING"),
            ClusterState::Repairing => write!(f, "REPAIRING"),
            ClusterState::Deleting => write!(f, "DELETING"),
            ClusterState::Unknown(s) if s.is_empty() => write!(f, "UNKNOWN"),
            ClusterState::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Cluster class; decides the polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterTier {
    Free,
    Paid,
}

impl fmt::Display for ClusterTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterTier::Free => write!(f, "free"),
            ClusterTier::Paid => write!(f, "paid"),
        }
    }
}

/// Dedicated (paid tier) instance sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum InstanceSize {
    #[value(name = "M10")]
    M10,
    #[value(name = "M20")]
    M20,
    #[value(name = "M30")]
    M30,
    #[value(name = "M40")]
    M40,
    #[value(name = "M50")]
    M50,
    #[value(name = "M60")]
    M60,
    #[value(name = "M80")]
    M80,
    #[value(name = "M140")]
    M140,
    #[value(name = "M200")]
    M200,
}

impl InstanceSize {
    pub const ALL: [InstanceSize; 9] = [
        InstanceSize::M10,
        InstanceSize::M20,
        InstanceSize::M30,
        InstanceSize::M40,
        InstanceSize::M50,
        InstanceSize::M60,
        InstanceSize::M80,
        InstanceSize::M140,
        InstanceSize::M200,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceSize::M10 => "M10",
            InstanceSize::M20 => "M20",
            InstanceSize::M30 => "M30",
            InstanceSize::M40 => "M40",
            InstanceSize::M50 => "M50",
            InstanceSize::M60 => "M60",
            InstanceSize::M80 => "M80",
            InstanceSize::M140 => "M140",
            InstanceSize::M200 => "M200",
        }
    }

    /// Disk size used when the caller does not ask for one
    pub fn default_storage_gb(&self) -> u32 {
        match self {
            InstanceSize::M10 | InstanceSize::M20 => 10,
            _ => 20,
        }
    }
}

impl fmt::Display for InstanceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstanceSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown instance size '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_state_parsing() {
        assert_eq!(ClusterState::from("IDLE"), ClusterState::Idle);
        assert_eq!(ClusterState::from("CREATING"), ClusterState::Creating);
        assert_eq!(
            ClusterState::from("PAUSED"),
            ClusterState::Unknown("PAUSED".to_string())
        );
        assert!(ClusterState::Idle.is_ready());
        assert!(!ClusterState::Creating.is_ready());
        assert!(!ClusterState::from("idle").is_ready());
    }

    #[test]
    fn test_cluster_without_state_is_not_ready() {
        let cluster: Cluster = serde_json::from_value(json!({"name": "demo"})).unwrap();
        assert!(!cluster.state().is_ready());
        assert_eq!(cluster.state().to_string(), "UNKNOWN");
    }

    #[test]
    fn test_cluster_deserialization() {
        let cluster: Cluster = serde_json::from_value(json!({
            "name": "demo",
            "groupId": "p1",
            "stateName": "IDLE",
            "clusterType": "REPLICASET",
            "connectionStrings": {"standardSrv": "mongodb+srv://demo.abc.mongodb.net"}
        }))
        .unwrap();

        assert!(cluster.state().is_ready());
        assert_eq!(
            cluster.standard_srv(),
            Some("mongodb+srv://demo.abc.mongodb.net")
        );
    }

    #[test]
    fn test_empty_standard_srv_is_ignored() {
        let cluster: Cluster = serde_json::from_value(json!({
            "name": "demo",
            "connectionStrings": {"standardSrv": ""}
        }))
        .unwrap();
        assert!(cluster.standard_srv().is_none());
    }

    #[test]
    fn test_paginated_organizations() {
        let page: Paginated<Organization> = serde_json::from_value(json!({
            "results": [
                {"id": "org1", "name": "Organization 1"},
                {"id": "org2", "name": "Organization 2"}
            ],
            "totalCount": 2
        }))
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, "org1");

        let empty: Paginated<Organization> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn test_project_created_timestamp() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "name": "Demo",
            "orgId": "org1",
            "created": "2025-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(project.org_id, "org1");
        assert!(project.created.is_some());
    }

    #[test]
    fn test_default_storage_by_instance_size() {
        assert_eq!(InstanceSize::M10.default_storage_gb(), 10);
        assert_eq!(InstanceSize::M20.default_storage_gb(), 10);
        assert_eq!(InstanceSize::M30.default_storage_gb(), 20);
        assert_eq!(InstanceSize::M200.default_storage_gb(), 20);
    }

    #[test]
    fn test_instance_size_from_str() {
        assert_eq!("M40".parse::<InstanceSize>(), Ok(InstanceSize::M40));
        assert_eq!("m140".parse::<InstanceSize>(), Ok(InstanceSize::M140));
        assert!("M0".parse::<InstanceSize>().is_err());
    }
}
