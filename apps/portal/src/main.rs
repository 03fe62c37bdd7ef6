use portal::cli::Cli;
use portal::commands::{self, Context};
use portal::error::PortalAppError;
use portal::logger;

use common::ErrorLocation;

use std::fs;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

const APP_DIR: &str = "sanjose-portal";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, PortalAppError> {
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR).join("logs")))
        .unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).map_err(|e| PortalAppError::Portal {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;
    logger::initialize(&log_dir, cli.verbose)?;

    let ctx = Context::from_env(cli.relays.clone())?;
    commands::run(&cli, &ctx).await
}
