//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};

/// Reclaim - free disk space by retiring low-value torrents.
#[derive(Debug, Parser)]
#[command(name = "reclaim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RECLAIM_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove torrents to meet the free-space target and category caps
    Clean(CleanArgs),

    /// Record today's ratio of every torrent
    LogRatios,

    /// Show torrents in eviction order with their scores
    Rank(RankArgs),

    /// Validate the configuration file and rule tables
    CheckConfig,
}

/// Arguments for the clean command.
#[derive(Debug, Parser)]
pub struct CleanArgs {
    /// Plan and report only; delete nothing
    #[arg(long)]
    pub test: bool,
}

/// Arguments for the rank command.
#[derive(Debug, Parser)]
pub struct RankArgs {
    /// Only show this category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Include torrents that are not yet eligible for removal
    #[arg(short, long)]
    pub all: bool,

    /// Maximum number of rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_command() {
        let cli = Cli::parse_from(["reclaim", "clean", "--test"]);
        match cli.command {
            Command::Clean(args) => assert!(args.test),
            _ => panic!("Expected Clean command"),
        }
        assert!(matches!(cli.format, CliFormat::Table));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["reclaim", "-vv", "--no-color", "--config", "/tmp/r.toml", "log-ratios"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert_eq!(cli.config.as_deref(), Some("/tmp/r.toml"));
        assert!(matches!(cli.command, Command::LogRatios));
    }

    #[test]
    fn test_rank_command() {
        let cli = Cli::parse_from(["reclaim", "rank", "--category", "tv", "--all", "-f", "json"]);
        match cli.command {
            Command::Rank(args) => {
                assert_eq!(args.category.as_deref(), Some("tv"));
                assert!(args.all);
                assert!(args.limit.is_none());
            }
            _ => panic!("Expected Rank command"),
        }
        assert!(matches!(cli.format, CliFormat::Json));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["reclaim"]).is_err());
        assert!(Cli::try_parse_from(["reclaim", "check-config"]).is_ok());
    }
}
