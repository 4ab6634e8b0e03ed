//! weekgrid CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use weekgrid_core::{TracingConfig, init_tracing};

use weekgrid_client::cli::{Cli, Command, ConfigAction};
use weekgrid_client::commands;
use weekgrid_client::config::ClientConfig;
use weekgrid_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    let tracing = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: logging disabled: {}", e);
    }
    debug!(source = config.source.select().kind(), "Loaded configuration");

    let overrides = cli.source.overrides();
    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => {
                let mut effective = config.clone();
                effective.source = overrides.apply(&config.source);
                commands::config::dump(&effective)
            }
            ConfigAction::Path => commands::config::path(),
        },
        Some(Command::Grid {
            origin_hour,
            end_hour,
        }) => {
            let mut grid = config.grid;
            grid.origin_hour = origin_hour.unwrap_or(grid.origin_hour);
            grid.end_hour = end_hour.unwrap_or(grid.end_hour);
            let grid = grid.to_grid_config()?;

            let week = commands::load_week(&config, &overrides).await;
            commands::grid::print(&week, grid)
        }
        Some(Command::Week) | None => {
            let week = commands::load_week(&config, &overrides).await;
            commands::week::print(&week)
        }
    }
}
