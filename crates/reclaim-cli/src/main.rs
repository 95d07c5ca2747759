//! Reclaim CLI - free disk space by retiring low-value torrents.

use clap::Parser;
use reclaim_cli::commands;
use reclaim_cli::{logging, Cli, Command, Config, Formatter};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> reclaim_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config
    let path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };
    let config = Config::load(&path)?;

    logging::init(config.level()?, cli.verbose);

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    match cli.command {
        Command::Clean(args) => commands::execute_clean(args, &config, &formatter).await?,
        Command::LogRatios => commands::execute_log_ratios(&config, &formatter).await?,
        Command::Rank(args) => commands::execute_rank(args, &config, &formatter).await?,
        Command::CheckConfig => commands::execute_check_config(&path, &config, &formatter)?,
    }

    Ok(())
}
