//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use sift_client::IdlClient;
use sift_dispatcher::{Dispatcher, FileResultSink, RunReport, StopReason};
use sift_extractor::{CorpusWalker, Extractor};
use tracing::info;

/// Execute the run command.
///
/// Returns how the run ended; the caller maps it to the exit status.
pub async fn execute_run(args: RunArgs, mut config: Config, formatter: &Formatter) -> Result<StopReason> {
    if args.dry_run {
        config.dispatch.dry_run = true;
    }
    config.validate()?;

    let report = run_corpus(&config).await?;
    println!("{}", formatter.format_report(&report)?);

    Ok(report.stop_reason)
}

/// Walk the configured corpus and dispatch every unit
pub async fn run_corpus(config: &Config) -> Result<RunReport> {
    let walker = CorpusWalker::scan(&config.corpus)?;
    info!(
        "Found {} units under {}",
        walker.len(),
        config.corpus.data_dir.display()
    );

    let client = IdlClient::new(&config.api.endpoint, &config.api.api_key)?;
    let sink = FileResultSink::new(&config.corpus.results_dir);
    let extractor = Extractor::new(&config.limits);

    let mut dispatcher = Dispatcher::new(client, sink, extractor, &config.dispatch);
    Ok(dispatcher.run(walker).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn corpus(dir: &TempDir) -> Config {
        let data = dir.path().join("data");
        fs::create_dir_all(data.join("acme")).unwrap();
        fs::write(data.join("acme").join("a.json"), r#"[{"message": "hello"}]"#).unwrap();
        fs::write(data.join("acme").join("b.json"), "not json").unwrap();

        let mut config = Config::default();
        config.corpus.data_dir = data;
        config.corpus.results_dir = dir.path().join("results");
        config
    }

    #[tokio::test]
    async fn test_dry_run_visits_corpus_without_writing() {
        let dir = TempDir::new().unwrap();
        let mut config = corpus(&dir);
        config.dispatch.dry_run = true;
        config.validate().unwrap();

        let report = run_corpus(&config).await.unwrap();

        assert_eq!(report.stop_reason, StopReason::Completed);
        assert_eq!(report.metrics.units_seen, 2);
        assert_eq!(report.metrics.dry_run_skipped, 1);
        assert_eq!(report.metrics.malformed, 1);
        assert_eq!(report.metrics.calls_made, 0);
        assert!(!dir.path().join("results").exists());
    }

    #[tokio::test]
    async fn test_missing_corpus_is_error() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.corpus.data_dir = dir.path().join("absent");
        config.dispatch.dry_run = true;

        let result = run_corpus(&config).await;
        assert!(matches!(result, Err(CliError::Extractor(_))));
    }

    #[tokio::test]
    async fn test_run_without_key_fails_validation() {
        let dir = TempDir::new().unwrap();
        let config = corpus(&dir);
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);

        let result = execute_run(RunArgs { dry_run: false }, config, &formatter).await;
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
