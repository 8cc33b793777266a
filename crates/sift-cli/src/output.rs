//! Output formatting for the CLI.

use crate::config::{mask_key, Config, OutputFormat};
use crate::error::Result;
use colored::*;
use serde_json::{json, Value};
use sift_dispatcher::{RunReport, StopReason};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report_json(report))?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report.stop_reason.to_string()),
        }
    }

    /// Format the effective configuration, API key masked.
    pub fn format_config(&self, config: &Config) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&config.masked())?),
            OutputFormat::Table => Ok(self.format_config_table(config)),
            OutputFormat::Quiet => Ok("ok".to_string()),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let metrics = &report.metrics;
        let headline = format!("Run {} {}", report.run_id, report.stop_reason);
        let mut sections = vec![match report.stop_reason {
            StopReason::Completed => self.success(&headline),
            StopReason::QuotaExhausted => self.warning(&headline),
            StopReason::TransportFault => self.error(&headline),
        }];

        if let Some(e) = &report.error {
            sections.push(self.error(&e.to_string()));
        }

        let rows = [
            ("Units seen", metrics.units_seen.to_string()),
            ("Calls made", metrics.calls_made.to_string()),
            ("Succeeded", metrics.succeeded.to_string()),
            ("Remote failures", metrics.remote_failures.to_string()),
            ("Malformed", metrics.malformed.to_string()),
            ("Unreadable", metrics.unreadable.to_string()),
            ("Sink failures", metrics.sink_failures.to_string()),
            ("Truncated", metrics.truncated.to_string()),
            ("Alerts", metrics.alerts.to_string()),
            ("Dry run (not sent)", metrics.dry_run_skipped.to_string()),
            ("Units left", report.units_left.to_string()),
            ("Elapsed", format!("{:.1}s", metrics.elapsed.as_secs_f64())),
        ];
        sections.push(two_column_table(["Metric", "Value"], &rows));

        if !report.failures.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Unit", "Kind", "Detail"]);
            for failure in &report.failures {
                builder.push_record([
                    failure.unit.clone(),
                    failure.kind.to_string(),
                    shorten(&failure.detail, 80),
                ]);
            }
            sections.push(styled(builder));
        }

        for alert in &report.alerts {
            sections.push(self.colorize(&format!("⚑ {}", alert), "magenta"));
        }

        sections.join("\n")
    }

    fn format_config_table(&self, config: &Config) -> String {
        let rows = [
            ("corpus.data_dir", config.corpus.data_dir.display().to_string()),
            ("corpus.results_dir", config.corpus.results_dir.display().to_string()),
            ("corpus.extension", config.corpus.extension.clone()),
            ("limits.max_payload_bytes", config.limits.max_payload_bytes.to_string()),
            ("dispatch.starting_units", config.dispatch.starting_units.to_string()),
            (
                "dispatch.max_requests_per_minute",
                config.dispatch.max_requests_per_minute.to_string(),
            ),
            (
                "dispatch.significance_threshold",
                config.dispatch.significance_threshold.to_string(),
            ),
            ("dispatch.dry_run", config.dispatch.dry_run.to_string()),
            ("api.endpoint", config.api.endpoint.clone()),
            ("api.api_key", mask_key(&config.api.api_key)),
        ];
        two_column_table(["Setting", "Value"], &rows)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn two_column_table(header: [&str; 2], rows: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for (name, value) in rows {
        builder.push_record([*name, value.as_str()]);
    }
    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Cut long details for table cells
fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}…", head)
}

fn report_json(report: &RunReport) -> Value {
    let metrics = &report.metrics;
    json!({
        "run_id": report.run_id.to_string(),
        "started_at_ms": report.run_id.started_at_ms(),
        "stop_reason": report.stop_reason.to_string(),
        "error": report.error.as_ref().map(ToString::to_string),
        "units_left": report.units_left,
        "metrics": {
            "units_seen": metrics.units_seen,
            "calls_made": metrics.calls_made,
            "succeeded": metrics.succeeded,
            "remote_failures": metrics.remote_failures,
            "malformed": metrics.malformed,
            "unreadable": metrics.unreadable,
            "truncated": metrics.truncated,
            "sink_failures": metrics.sink_failures,
            "alerts": metrics.alerts,
            "dry_run_skipped": metrics.dry_run_skipped,
            "elapsed_secs": metrics.elapsed.as_secs_f64(),
        },
        "failures": report.failures.iter().map(|f| json!({
            "unit": f.unit,
            "kind": f.kind.to_string(),
            "detail": f.detail,
        })).collect::<Vec<_>>(),
        "alerts": report.alerts.iter().map(|a| json!({
            "unit": a.unit.to_string(),
            "interests": a.interests.iter().map(|i| json!([i.label, i.score])).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_client::MockEnrichment;
    use sift_dispatcher::{DispatchConfig, Dispatcher, FileResultSink};
    use sift_domain::{UnitId, WorkUnit};
    use sift_extractor::Extractor;
    use tempfile::TempDir;

    async fn sample_report(starting_units: u64) -> RunReport {
        let dir = TempDir::new().unwrap();
        let service = MockEnrichment::new();
        service.push_success(&[("sports", 1.2), ("finance", 0.3)], Some(7));
        service.push_failure(500, Some(6));

        let config = DispatchConfig {
            starting_units,
            max_requests_per_minute: 6000,
            ..DispatchConfig::default()
        };
        let mut dispatcher = Dispatcher::new(
            service,
            FileResultSink::new(dir.path()),
            Extractor::default(),
            &config,
        );
        let units = vec![
            Ok(WorkUnit::in_memory(UnitId::new("acme", "a.json"), r#"[{"message": "goal"}]"#)),
            Ok(WorkUnit::in_memory(UnitId::new("acme", "b.json"), r#"[{"message": "oops"}]"#)),
        ];
        dispatcher.run(units).await
    }

    #[tokio::test]
    async fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = sample_report(10).await;
        let output = formatter.format_report(&report).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["run_id"], report.run_id.to_string());
        assert_eq!(value["started_at_ms"], report.run_id.started_at_ms());
        assert_eq!(value["stop_reason"], "completed");
        assert_eq!(value["units_left"], 6);
        assert_eq!(value["metrics"]["succeeded"], 1);
        assert_eq!(value["metrics"]["unreadable"], 0);
        assert_eq!(value["failures"][0]["kind"], "remote");
        assert_eq!(value["alerts"][0]["unit"], "acme/a.json");
        assert_eq!(value["alerts"][0]["interests"], json!([["sports", 1.2]]));
    }

    #[tokio::test]
    async fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&sample_report(10).await).unwrap();

        assert!(output.contains("completed"));
        assert!(output.contains("Units seen"));
        assert!(output.contains("Detail"));
        assert!(output.contains("acme/a.json has significant interests"));
    }

    #[tokio::test]
    async fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_report(&sample_report(0).await).unwrap();
        assert_eq!(output, "quota exhausted");
    }

    #[test]
    fn test_config_output_masks_key() {
        let mut config = Config::default();
        config.api.api_key = "0123456789abcdef".to_string();

        for format in [OutputFormat::Table, OutputFormat::Json] {
            let output = Formatter::new(format, false).format_config(&config).unwrap();
            assert!(output.contains("****cdef"));
            assert!(!output.contains("0123456789abcdef"));
        }
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short", 10), "short");
        assert_eq!(shorten("ééééé", 3), "ééé…");
    }
}
