//! CLI entry point - the composition root.
//!
//! Dispatch only; all wiring of hosts, fetchers and managers lives in
//! the handlers.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use advkit_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Provision(args) => handlers::provision::execute(args).await,
        Commands::Build(args) => handlers::build::execute(args).await,
        Commands::CheckUpdates(args) => handlers::check_updates::execute(args).await,
    }
}
