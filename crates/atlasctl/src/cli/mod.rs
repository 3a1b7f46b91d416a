//! CLI structure and command definitions
//!
//! One flat subcommand per provisioning operation, plus shell completions.

use clap::{Parser, Subcommand};

pub mod cluster;

pub use cluster::*;

/// Provision MongoDB Atlas projects and clusters from the command line
#[derive(Parser, Debug)]
#[command(name = "atlasctl")]
#[command(version, about = "Provision MongoDB Atlas projects and clusters")]
#[command(arg_required_else_help = true)]
#[command(long_about = "
Provision MongoDB Atlas projects and clusters

Credentials are read from the environment or a .env file in the current
directory:
    ATLAS_PUBLIC_KEY, ATLAS_PRIVATE_KEY   API key pair (all commands)
    DB_USER, DB_PASSWORD                  admin user created on new clusters

EXAMPLES:
    # List organizations visible to the API key
    atlasctl list-orgs

    # Create a project in the first organization
    atlasctl create-project --name Demo

    # Create a free M0 cluster and wait for it
    atlasctl create-free-cluster --project-id 5f1a... --name sandbox

    # Create a dedicated cluster with 40 GB of storage
    atlasctl create-paid-cluster --project-id 5f1a... --name prod --instance-size M30 --storage-size 40

For more help on a specific command, run:
    atlasctl <command> --help
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ATLASCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, global = true, env = "ATLASCTL_LOG_FILE")]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List organizations
    #[command(name = "list-orgs")]
    ListOrgs,

    /// Create a project
    #[command(name = "create-project")]
    #[command(after_help = "EXAMPLES:
    # Use the first organization returned by the API
    atlasctl create-project --name Demo

    # Use a specific organization
    atlasctl create-project --name Demo --org-id 5e2211c17a3e5a48f5497de3
")]
    CreateProject {
        /// Project name: letters and digits only, at most 20 characters
        #[arg(long)]
        name: String,

        /// Organization ID (defaults to the first organization)
        #[arg(long)]
        org_id: Option<String>,
    },

    /// Create a free-tier (M0) cluster and wait until it is ready
    #[command(name = "create-free-cluster")]
    CreateFreeCluster(FreeClusterArgs),

    /// Create a paid-tier cluster and wait until it is ready
    #[command(name = "create-paid-cluster")]
    CreatePaidCluster(PaidClusterArgs),

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlasctl_core::InstanceSize;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_project() {
        let cli = Cli::try_parse_from(["atlasctl", "create-project", "--name", "Demo"]).unwrap();
        match cli.command {
            Commands::CreateProject { name, org_id } => {
                assert_eq!(name, "Demo");
                assert!(org_id.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.output, OutputFormat::Auto);
    }

    #[test]
    fn test_parse_paid_cluster_instance_size_ignores_case() {
        let cli = Cli::try_parse_from([
            "atlasctl",
            "create-paid-cluster",
            "--project-id",
            "p1",
            "--name",
            "prod",
            "--instance-size",
            "m30",
            "--storage-size",
            "40",
        ])
        .unwrap();
        match cli.command {
            Commands::CreatePaidCluster(args) => {
                assert_eq!(args.instance_size, InstanceSize::M30);
                assert_eq!(args.storage_size.as_deref(), Some("40"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_instance_size_is_rejected() {
        let result = Cli::try_parse_from([
            "atlasctl",
            "create-paid-cluster",
            "--project-id",
            "p1",
            "--name",
            "prod",
            "--instance-size",
            "M5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["atlasctl", "list-orgs", "-o", "json", "-vv"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }
}
