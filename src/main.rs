use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use loader_controller::cli::commands::{
    lookup::LookupCommand, print_config::PrintConfigCommand, reboot::RebootCommand, run::RunCommand,
    sensor_test::SensorTestCommand, Command,
};
use loader_controller::cli::{Cli, Commands};
use loader_controller::{init_telemetry, LoaderConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = LoaderConfig::load_env_file()?;
    let config = Arc::new(LoaderConfig::load()?);
    init_telemetry(&config)?;
    if env_file {
        tracing::info!("Loaded environment variables from .env file");
    }

    match cli.command {
        // Default behavior: no subcommand runs the controller
        None | Some(Commands::Run) => {
            tokio::runtime::Runtime::new()?.block_on(async { RunCommand::new(config).execute().await })
        }
        Some(Commands::SensorTest) => tokio::runtime::Runtime::new()?
            .block_on(async { SensorTestCommand::new(config).execute().await }),
        Some(Commands::Reboot) => {
            tokio::runtime::Runtime::new()?.block_on(async { RebootCommand::new(config).execute().await })
        }
        Some(Commands::PrintConfig) => tokio::runtime::Runtime::new()?
            .block_on(async { PrintConfigCommand::new(config).execute().await }),
        Some(Commands::Lookup { target }) => tokio::runtime::Runtime::new()?
            .block_on(async { LookupCommand::new(config, target).execute().await }),
    }
}
