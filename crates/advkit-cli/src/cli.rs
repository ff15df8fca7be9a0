//! Root parser and subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line interface for provisioning the packaging tool and
/// building AIP projects from CI.
#[derive(Parser)]
#[command(name = "advkit")]
#[command(about = "Provision Advanced Installer and build AIP projects")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install, license and register a tool version on this host
    Provision(ProvisionArgs),

    /// Compile a command script for an AIP project and run it
    Build(BuildArgs),

    /// Query the published-versions feed and the deprecation policy
    CheckUpdates(CheckUpdatesArgs),
}

#[derive(Args)]
pub struct ProvisionArgs {
    /// Tool version to install, e.g. "22.9"
    #[arg(long)]
    pub version: String,

    /// Installation home directory; may contain ${VAR} macros
    #[arg(long)]
    pub home: String,

    /// License key to register after installation
    #[arg(long, env = "ADVINST_LICENSE_KEY", hide_env_values = true)]
    pub license: Option<String>,

    /// Also register the tool's COM server
    #[arg(long)]
    pub register_com: bool,

    /// Download URL overriding the version-templated default
    #[arg(long)]
    pub download_url: Option<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// JSON job file carrying installations, build parameters and an
    /// optional provisioning manifest
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Path to the AIP project file, absolute or workspace-relative
    #[arg(long, required_unless_present = "job")]
    pub aip: Option<String>,

    /// Build configuration to run; omit for all configurations
    #[arg(long, default_value = "")]
    pub build_name: String,

    /// Output folder for the result package
    #[arg(long, default_value = "")]
    pub output_folder: String,

    /// File name of the result package
    #[arg(long, default_value = "")]
    pub output_name: String,

    /// Skip the digital signature step
    #[arg(long)]
    pub skip_signing: bool,

    /// Extra tool commands, one per line, passed through verbatim
    #[arg(long, default_value = "")]
    pub extra_commands: String,

    /// Installation home directory; may contain ${VAR} macros
    #[arg(long, required_unless_present = "job")]
    pub home: Option<String>,

    /// Tool version to provision when the installation is missing
    #[arg(long)]
    pub version: Option<String>,

    /// License key to register when provisioning
    #[arg(long, env = "ADVINST_LICENSE_KEY", hide_env_values = true)]
    pub license: Option<String>,

    /// Build working directory; defaults to the current directory
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Extra build variable, NAME=VALUE, layered over the environment;
    /// repeatable
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
}

#[derive(Args)]
pub struct CheckUpdatesArgs {
    /// Report whether this specific version is deprecated
    #[arg(long)]
    pub version: Option<String>,

    /// Recency window in months; versions older than the last release
    /// inside the window are deprecated
    #[arg(long, default_value_t = advkit_provision::DEFAULT_RECENCY_WINDOW_MONTHS)]
    pub window_months: u32,
}
