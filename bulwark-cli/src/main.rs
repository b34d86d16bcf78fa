//! Bulwark CLI -- merge and export advisory repositories

mod cli;
mod commands;
mod distro;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use bulwark_core::config::{BulwarkConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output_format);

    match cli.command {
        Commands::Export(args) => {
            // bulwark.toml is optional for export
            let mut config = BulwarkConfig::load_or_default(&cli.config).await?;
            if let Some(level) = cli.log_level {
                config.general.log_level = level;
                config.validate()?;
            }
            init_logging(&config.general)?;

            tracing::debug!(config = %cli.config.display(), "bulwark export starting");
            commands::export::execute(args, &config, &writer).await
        }
        Commands::Config(args) => {
            let general = GeneralConfig {
                log_level: cli.log_level.unwrap_or_else(|| "warn".to_owned()),
                ..GeneralConfig::default()
            };
            init_logging(&general)?;

            commands::config::execute(args, &cli.config, &writer).await
        }
    }
}

fn init_logging(general: &GeneralConfig) -> Result<(), CliError> {
    logging::init_tracing(general).map_err(|e| CliError::Config(e.to_string()))
}
