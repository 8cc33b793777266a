//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sift - Score a chat corpus against the InData Labs interests model.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.sift/config.toml)
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

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
    /// Quiet format (stop reason only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process the corpus
    Run(RunArgs),

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Extract and limit every unit without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Log filter directive implied by `--verbose`, if any
    pub fn log_directive(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["sift", "run"]);
        match cli.command {
            Command::Run(args) => assert!(!args.dry_run),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_with_options() {
        let cli = Cli::parse_from(["sift", "run", "--config", "/tmp/sift.toml", "--dry-run"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sift.toml")));
        match cli.command {
            Command::Run(args) => assert!(args.dry_run),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_check_config_command() {
        let cli = Cli::parse_from(["sift", "check-config", "--format", "json"]);
        assert!(matches!(cli.command, Command::CheckConfig));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::parse_from(["sift", "run"]);
        assert_eq!(cli.log_directive(), None);

        let cli = Cli::parse_from(["sift", "-v", "run"]);
        assert_eq!(cli.log_directive(), Some("debug"));

        let cli = Cli::parse_from(["sift", "-vv", "run"]);
        assert_eq!(cli.log_directive(), Some("trace"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["sift"]).is_err());
    }
}
