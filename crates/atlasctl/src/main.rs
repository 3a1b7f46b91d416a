use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use tracing::{debug, error, info, trace};

mod cli;
mod commands;
mod connection;
mod error;
mod logging;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::CliError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version go to stdout with status 0; usage errors exit 1
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let _logging = logging::init_tracing(cli.verbose, cli.log_file.as_deref());

    let env_dir = std::env::current_dir()?;
    let result = match ConnectionManager::resolve(cli.config_file.as_deref(), &env_dir) {
        Ok(conn_mgr) => execute_command(&cli, &conn_mgr).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        println!("Failed to {}: {}", command_action(&cli.command), e.reason());
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), CliError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::ListOrgs => commands::orgs::handle_list_orgs(conn_mgr, cli.output).await,
        Commands::CreateProject { name, org_id } => {
            commands::project::handle_create_project(conn_mgr, name, org_id.as_deref(), cli.output)
                .await
        }
        Commands::CreateFreeCluster(args) => {
            commands::cluster::handle_create_free_cluster(conn_mgr, args, cli.output).await
        }
        Commands::CreatePaidCluster(args) => {
            commands::cluster::handle_create_paid_cluster(conn_mgr, args, cli.output).await
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Verb phrase used in the `Failed to ...` line
fn command_action(command: &Commands) -> &'static str {
    match command {
        Commands::ListOrgs => "list organizations",
        Commands::CreateProject { .. } => "create project",
        Commands::CreateFreeCluster(_) => "create free cluster",
        Commands::CreatePaidCluster(_) => "create paid cluster",
        Commands::Completions { .. } => "generate completions",
    }
}

/// Format command for human-readable logging (without sensitive data)
fn format_command(command: &Commands) -> String {
    match command {
        Commands::ListOrgs => "list-orgs".to_string(),
        Commands::CreateProject { name, org_id } => match org_id {
            Some(org_id) => format!("create-project --name {} --org-id {}", name, org_id),
            None => format!("create-project --name {}", name),
        },
        Commands::CreateFreeCluster(args) => format!(
            "create-free-cluster --project-id {} --name {} --region {}",
            args.project_id, args.name, args.region
        ),
        Commands::CreatePaidCluster(args) => format!(
            "create-paid-cluster --project-id {} --name {} --instance-size {} --region {}",
            args.project_id, args.name, args.instance_size, args.region
        ),
        Commands::Completions { shell } => format!("completions {:?}", shell),
    }
}
