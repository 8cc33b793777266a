//! Sift CLI - Score a chat corpus against the InData Labs interests model.

use clap::Parser;
use sift_cli::commands;
use sift_cli::{Cli, Command, Config, Formatter};
use sift_dispatcher::StopReason;
use tracing_subscriber::EnvFilter;

/// Exit status when the API quota ran out before the corpus did
const EXIT_QUOTA_EXHAUSTED: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(StopReason::Completed) => {}
        Ok(StopReason::QuotaExhausted) => std::process::exit(EXIT_QUOTA_EXHAUSTED),
        Ok(StopReason::TransportFault) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (default info) unless -v is given
fn init_logging(cli: &Cli) {
    let filter = match cli.log_directive() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> sift_cli::Result<StopReason> {
    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, config, &formatter).await,
        Command::CheckConfig => {
            commands::execute_check_config(&config, &formatter)?;
            Ok(StopReason::Completed)
        }
    }
}
