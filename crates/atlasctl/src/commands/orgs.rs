//! `list-orgs`

use atlasctl_core::Organization;
use atlasctl_core::workflows::list_organizations;

use crate::cli;
use crate::connection::ConnectionManager;
use crate::error::{CliError, Result as CliResult};
use crate::output::{OutputFormat, print_output};

pub async fn handle_list_orgs(
    conn_mgr: &ConnectionManager,
    output_format: cli::OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client()?;
    let orgs = list_organizations(&client)
        .await
        .map_err(|e| CliError::operation("list organizations", e))?;

    match OutputFormat::structured(output_format) {
        Some(format) => print_output(&orgs, format)?,
        None => print_org_lines(&orgs),
    }
    Ok(())
}

fn print_org_lines(orgs: &[Organization]) {
    println!("Available organizations:");
    for org in orgs {
        println!("ID: {}, Name: {}", org.id, org.name);
    }
}
