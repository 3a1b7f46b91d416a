//! `create-project`

use atlasctl_core::params::validate_project_name;
use atlasctl_core::workflows::create_project;
use tracing::debug;

use crate::cli;
use crate::connection::ConnectionManager;
use crate::error::{CliError, Result as CliResult};
use crate::output::{OutputFormat, print_output};

pub async fn handle_create_project(
    conn_mgr: &ConnectionManager,
    name: &str,
    org_id: Option<&str>,
    output_format: cli::OutputFormat,
) -> CliResult<()> {
    // A bad name is reported ahead of missing credentials
    validate_project_name(name).map_err(|e| CliError::operation("create project", e.into()))?;

    let client = conn_mgr.create_client()?;
    debug!("Creating project {} (org: {:?})", name, org_id);

    let project = create_project(&client, name, org_id)
        .await
        .map_err(|e| CliError::operation("create project", e))?;

    match OutputFormat::structured(output_format) {
        None => {
            println!("Project created successfully. Project ID: {}", project.id);
        }
        Some(format) => print_output(&project, format)?,
    }
    Ok(())
}
