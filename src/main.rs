//! vunorm CLI - VU-Referenced Loudness Normalizer
//!
//! Command-line interface for the vunorm normalization pipeline.

use clap::Parser;
use env_logger::Env;
use log::info;

use vunorm::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("vunorm v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd)?,
        None => {
            // Interactive mode: prompt for the input path
            commands::interactive()?;
        }
    }

    Ok(())
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Normalize {
            input,
            output,
            bit_depth,
            tuning,
        } => {
            let config = tuning.resolve()?;
            commands::normalize(&input, output.as_deref(), bit_depth, &config)?;
        }
        Commands::Measure { input, tuning } => {
            let config = tuning.resolve()?;
            commands::measure(&input, &config)?;
        }
    }
    Ok(())
}
