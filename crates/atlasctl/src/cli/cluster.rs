//! Cluster command arguments

use atlasctl_core::InstanceSize;
use atlasctl_core::params::{FreeClusterParams, PaidClusterParams};
use clap::Args;

/// Arguments for `create-free-cluster`
#[derive(Args, Debug, Clone)]
pub struct FreeClusterArgs {
    /// Project ID
    #[arg(long)]
    pub project_id: String,

    /// Cluster name
    #[arg(long)]
    pub name: String,

    /// Region in API form
    #[arg(long, default_value = FreeClusterParams::DEFAULT_REGION)]
    pub region: String,
}

impl FreeClusterArgs {
    pub fn to_params(&self) -> FreeClusterParams {
        FreeClusterParams::new(&self.name).with_region(&self.region)
    }
}

/// Arguments for `create-paid-cluster`
#[derive(Args, Debug, Clone)]
#[command(after_help = "EXAMPLES:
    # M10 with the default 10 GB disk
    atlasctl create-paid-cluster --project-id 5f1a... --name prod --instance-size M10

    # M30 with 40 GB in another region
    atlasctl create-paid-cluster --project-id 5f1a... --name prod --instance-size M30 --storage-size 40 --region EU_WEST_1
")]
pub struct PaidClusterArgs {
    /// Project ID
    #[arg(long)]
    pub project_id: String,

    /// Cluster name
    #[arg(long)]
    pub name: String,

    /// Instance size
    #[arg(long, value_enum, ignore_case = true)]
    pub instance_size: InstanceSize,

    /// Disk size in GB, 1 to 50 (default: 10 for M10/M20, 20 otherwise)
    #[arg(long)]
    pub storage_size: Option<String>,

    /// Region in API form
    #[arg(long, default_value = PaidClusterParams::DEFAULT_REGION)]
    pub region: String,
}

impl PaidClusterArgs {
    pub fn to_params(&self) -> PaidClusterParams {
        let params =
            PaidClusterParams::new(&self.name, self.instance_size).with_region(&self.region);
        match &self.storage_size {
            Some(size) => params.with_storage_size(size),
            None => params,
        }
    }
}
