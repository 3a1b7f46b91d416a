//! Provisioning workflows - multi-step operations
//!
//! Each workflow composes a few API calls with validation up front and
//! readiness polling in the middle. Cluster workflows run strictly in order:
//! submit, wait for IDLE, ensure the admin user, resolve the connection
//! string. A failure at any step ends the run.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::AtlasClient;
use crate::config::DatabaseCredentials;
use crate::connection_string::{ConnectionString, resolve_connection_string};
use crate::error::{CoreError, Result};
use crate::models::{ClusterState, ClusterTier, Organization, Paginated, Project};
use crate::params::{
    ClusterCreateRequest, CreateProjectRequest, DatabaseUserRequest, FreeClusterParams,
    PaidClusterParams, validate_project_name,
};
use crate::progress::{PollSettings, ProgressCallback, ProgressEvent, emit, wait_for_cluster};

/// Error code the API returns when the database user is already present
const USER_ALREADY_EXISTS: &str = "USER_ALREADY_EXISTS";

/// What happened to the administrative database user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserOutcome {
    Created,
    AlreadyExists,
}

/// Result of a completed cluster provisioning run
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedCluster {
    pub project_id: String,
    pub cluster_name: String,
    pub tier: ClusterTier,
    #[serde(serialize_with = "serialize_state")]
    pub state: ClusterState,
    pub user: UserOutcome,
    /// Serialized masked
    #[serde(serialize_with = "serialize_masked")]
    pub connection_string: ConnectionString,
}

fn serialize_state<S: serde::Serializer>(
    state: &ClusterState,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&state.to_string())
}

fn serialize_masked<S: serde::Serializer>(
    connection_string: &ConnectionString,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&connection_string.masked())
}

/// List the organizations visible to the API key
pub async fn list_organizations(client: &AtlasClient) -> Result<Vec<Organization>> {
    let context = "fetching organizations";
    let response = client.get("/orgs", context).await?;

    if response.status.as_u16() != 200 {
        let err = response.into_error("Failed to fetch organizations");
        error!("{}", err);
        return Err(err);
    }

    let page: Paginated<Organization> = response.json(context)?;
    Ok(page.results)
}

/// Create a project.
///
/// The name is validated before anything else. Without `org_id` the first
/// organization returned by [`list_organizations`] is used.
pub async fn create_project(
    client: &AtlasClient,
    name: &str,
    org_id: Option<&str>,
) -> Result<Project> {
    validate_project_name(name)?;

    let org_id = match org_id.filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let orgs = list_organizations(client).await?;
            let first = orgs.into_iter().next().ok_or(CoreError::NoOrganizations)?;
            info!("Using organization: {} (ID: {})", first.name, first.id);
            first.id
        }
    };

    let request = CreateProjectRequest {
        name: name.to_string(),
        org_id,
    };
    let context = "creating project";
    let response = client.post("/groups", &request, context).await?;

    if response.status.as_u16() != 201 {
        let err = response.into_error("Failed to create project");
        error!("{}", err);
        return Err(err);
    }

    let project: Project = response.json(context)?;
    info!("Project created successfully. Project ID: {}", project.id);
    Ok(project)
}

/// Create the administrative database user, accepting one that already
/// exists
pub async fn ensure_database_user(
    client: &AtlasClient,
    project_id: &str,
    credentials: &DatabaseCredentials,
) -> Result<UserOutcome> {
    let request = DatabaseUserRequest::admin(credentials);
    let response = client
        .post(
            &format!("/groups/{}/databaseUsers", project_id),
            &request,
            "creating database user",
        )
        .await?;

    match response.status.as_u16() {
        201 => {
            info!("Database user '{}' created", credentials.username);
            Ok(UserOutcome::Created)
        }
        409 if response.body.contains(USER_ALREADY_EXISTS) => {
            warn!(
                "Database user '{}' already exists, continuing",
                credentials.username
            );
            Ok(UserOutcome::AlreadyExists)
        }
        _ => {
            let err = response.into_error("Failed to create database user");
            error!("{}", err);
            Err(err)
        }
    }
}

/// Create a free-tier cluster and wait until it is usable
///
/// # Example
///
/// ```rust,ignore
/// use atlasctl_core::params::FreeClusterParams;
/// use atlasctl_core::progress::PollSettings;
/// use atlasctl_core::workflows::create_free_cluster_and_wait;
///
/// let provisioned = create_free_cluster_and_wait(
///     &client,
///     "5f1a...",
///     FreeClusterParams::new("sandbox"),
///     &credentials,
///     PollSettings::free_tier(),
///     &None,
/// )
/// .await?;
///
/// println!("Connection string: {}", provisioned.connection_string);
/// ```
pub async fn create_free_cluster_and_wait(
    client: &AtlasClient,
    project_id: &str,
    params: FreeClusterParams,
    credentials: &DatabaseCredentials,
    settings: PollSettings,
    on_progress: &Option<ProgressCallback>,
) -> Result<ProvisionedCluster> {
    let request = params.into_request();
    provision_cluster(
        client,
        project_id,
        &request,
        ClusterTier::Free,
        credentials,
        settings,
        on_progress,
    )
    .await
}

/// Create a paid-tier cluster and wait until it is usable.
///
/// The storage size is checked before any request is made.
pub async fn create_paid_cluster_and_wait(
    client: &AtlasClient,
    project_id: &str,
    params: PaidClusterParams,
    credentials: &DatabaseCredentials,
    settings: PollSettings,
    on_progress: &Option<ProgressCallback>,
) -> Result<ProvisionedCluster> {
    let request = params.into_request()?;
    provision_cluster(
        client,
        project_id,
        &request,
        ClusterTier::Paid,
        credentials,
        settings,
        on_progress,
    )
    .await
}

async fn provision_cluster(
    client: &AtlasClient,
    project_id: &str,
    request: &ClusterCreateRequest,
    tier: ClusterTier,
    credentials: &DatabaseCredentials,
    settings: PollSettings,
    on_progress: &Option<ProgressCallback>,
) -> Result<ProvisionedCluster> {
    let cluster_name = request.name.as_str();

    // Step 1: Submit
    let (context, failure) = match tier {
        ClusterTier::Free => ("creating cluster", "Failed to create cluster"),
        ClusterTier::Paid => ("creating paid cluster", "Failed to create paid cluster"),
    };
    let response = client
        .post(&format!("/groups/{}/clusters", project_id), request, context)
        .await?;
    if response.status.as_u16() != 201 {
        let err = response.into_error(failure);
        error!("{}", err);
        return Err(err);
    }
    info!("{} cluster '{}' creation initiated", tier, cluster_name);
    emit(
        on_progress,
        ProgressEvent::Submitted {
            cluster: cluster_name.to_string(),
        },
    );

    // Step 2: Wait for IDLE
    let cluster = wait_for_cluster(client, project_id, cluster_name, settings, on_progress).await?;
    info!("Cluster '{}' is ready", cluster_name);

    // Step 3: Admin user
    let user = ensure_database_user(client, project_id, credentials).await?;
    let username = credentials.username.clone();
    emit(
        on_progress,
        match user {
            UserOutcome::Created => ProgressEvent::UserCreated { username },
            UserOutcome::AlreadyExists => ProgressEvent::UserExists { username },
        },
    );

    // Step 4: Connection string
    let provider_region = request.provider_region();
    let connection_string = resolve_connection_string(
        client,
        project_id,
        cluster_name,
        provider_region.as_deref(),
        credentials,
    )
    .await;
    info!("Connection string: {}", connection_string);

    Ok(ProvisionedCluster {
        project_id: project_id.to_string(),
        cluster_name: cluster_name.to_string(),
        tier,
        state: cluster.state(),
        user,
        connection_string,
    })
}
