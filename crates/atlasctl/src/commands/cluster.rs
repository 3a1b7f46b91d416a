//! `create-free-cluster` and `create-paid-cluster`
//!
//! Both run the full provisioning workflow under a spinner and race it
//! against Ctrl-C. Cancelling stops polling; the remote cluster is left as is.

use std::future::Future;

use atlasctl_core::params::resolve_storage_size;
use atlasctl_core::workflows::{create_free_cluster_and_wait, create_paid_cluster_and_wait};
use atlasctl_core::{ClusterTier, CoreError, ProvisionedCluster};
use tracing::warn;

use super::spinner::provisioning_spinner;
use crate::cli::{self, FreeClusterArgs, PaidClusterArgs};
use crate::connection::ConnectionManager;
use crate::error::{CliError, Result as CliResult};
use crate::output::{OutputFormat, print_output};

pub async fn handle_create_free_cluster(
    conn_mgr: &ConnectionManager,
    args: &FreeClusterArgs,
    output_format: cli::OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client()?;
    let credentials = conn_mgr.database_credentials()?;
    let settings = conn_mgr.poll_settings(ClusterTier::Free);

    let (spinner, on_progress) = provisioning_spinner(&args.name);
    let result = until_cancelled(create_free_cluster_and_wait(
        &client,
        &args.project_id,
        args.to_params(),
        &credentials,
        settings,
        &on_progress,
    ))
    .await;
    spinner.finish_and_clear();

    let provisioned = result.map_err(|e| e.into_cli("create free cluster"))?;
    print_provisioned(&provisioned, "Free", output_format)
}

pub async fn handle_create_paid_cluster(
    conn_mgr: &ConnectionManager,
    args: &PaidClusterArgs,
    output_format: cli::OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client()?;

    // Storage is checked after the API keys but before the database user
    let params = args.to_params();
    if let Some(raw) = params.storage_size.as_deref() {
        resolve_storage_size(params.instance_size, Some(raw))
            .map_err(|e| CliError::operation("create paid cluster", e.into()))?;
    }

    let credentials = conn_mgr.database_credentials()?;
    let settings = conn_mgr.poll_settings(ClusterTier::Paid);

    let (spinner, on_progress) = provisioning_spinner(&args.name);
    let result = until_cancelled(create_paid_cluster_and_wait(
        &client,
        &args.project_id,
        params,
        &credentials,
        settings,
        &on_progress,
    ))
    .await;
    spinner.finish_and_clear();

    let provisioned = result.map_err(|e| e.into_cli("create paid cluster"))?;
    print_provisioned(&provisioned, "Paid", output_format)
}

/// Outcome of a run that may have been interrupted
enum RunError {
    Failed(CoreError),
    Cancelled,
}

impl RunError {
    fn into_cli(self, action: &'static str) -> CliError {
        match self {
            RunError::Failed(e) => CliError::operation(action, e),
            RunError::Cancelled => CliError::Cancelled,
        }
    }
}

async fn until_cancelled<F>(run: F) -> Result<ProvisionedCluster, RunError>
where
    F: Future<Output = atlasctl_core::Result<ProvisionedCluster>>,
{
    tokio::select! {
        result = run => result.map_err(RunError::Failed),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; the cluster may still be provisioning remotely");
            Err(RunError::Cancelled)
        }
    }
}

fn print_provisioned(
    provisioned: &ProvisionedCluster,
    tier_label: &str,
    output_format: cli::OutputFormat,
) -> CliResult<()> {
    match OutputFormat::structured(output_format) {
        None => {
            println!("{} cluster created successfully.", tier_label);
            println!("Connection string: {}", provisioned.connection_string.masked());
            println!("NOTE: Use the actual password when connecting to your database.");
        }
        Some(format) => print_output(provisioned, format)?,
    }
    Ok(())
}
