//! Metrics collection for dispatch runs

use std::time::Duration;

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchMetrics {
    /// Units pulled from the corpus
    pub units_seen: usize,

    /// Calls issued to the enrichment service
    pub calls_made: usize,

    /// Units scored and persisted
    pub succeeded: usize,

    /// Units the service answered with a failure
    pub remote_failures: usize,

    /// Units that could not be decoded
    pub malformed: usize,

    /// Units that could not be read from the corpus
    pub unreadable: usize,

    /// Units whose payload was truncated
    pub truncated: usize,

    /// Units scored but not persisted
    pub sink_failures: usize,

    /// Units that raised a significance alert
    pub alerts: usize,

    /// Units prepared but not sent (dry run)
    pub dry_run_skipped: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl DispatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit pulled from the corpus
    pub fn record_unit(&mut self) {
        self.units_seen += 1;
    }

    /// Record a call issued
    pub fn record_call(&mut self) {
        self.calls_made += 1;
    }

    /// Record a scored unit
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failure outcome
    pub fn record_remote_failure(&mut self) {
        self.remote_failures += 1;
    }

    /// Record a unit that could not be decoded
    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    /// Record a unit that could not be read
    pub fn record_unreadable(&mut self) {
        self.unreadable += 1;
    }

    /// Record a truncated payload
    pub fn record_truncation(&mut self) {
        self.truncated += 1;
    }

    /// Record a persistence failure
    pub fn record_sink_failure(&mut self) {
        self.sink_failures += 1;
    }

    /// Record an alert
    pub fn record_alert(&mut self) {
        self.alerts += 1;
    }

    /// Record a unit skipped by dry run
    pub fn record_dry_run(&mut self) {
        self.dry_run_skipped += 1;
    }

    /// Units that ended in any kind of per-unit error
    pub fn total_failed(&self) -> usize {
        self.remote_failures + self.malformed + self.unreadable + self.sink_failures
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Dispatch Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Units seen: {}", self.units_seen),
            format!("Calls made: {}", self.calls_made),
            format!("Succeeded: {}", self.succeeded),
            format!("Failed: {}", self.total_failed()),
        ];

        if self.total_failed() > 0 {
            lines.push(format!("  Remote failures: {}", self.remote_failures));
            lines.push(format!("  Malformed units: {}", self.malformed));
            lines.push(format!("  Unreadable units: {}", self.unreadable));
            lines.push(format!("  Sink failures: {}", self.sink_failures));
        }

        lines.push(format!("Truncated: {}", self.truncated));
        lines.push(format!("Alerts: {}", self.alerts));

        if self.dry_run_skipped > 0 {
            lines.push(format!("Dry run (not sent): {}", self.dry_run_skipped));
        }

        lines.push(format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.units_seen, 0);
        assert_eq!(metrics.calls_made, 0);
        assert_eq!(metrics.total_failed(), 0);
    }

    #[test]
    fn test_total_failed() {
        let mut metrics = DispatchMetrics::new();
        metrics.record_remote_failure();
        metrics.record_malformed();
        metrics.record_unreadable();
        metrics.record_sink_failure();
        assert_eq!(metrics.total_failed(), 4);
        assert_eq!(metrics.malformed, 1);
        assert_eq!(metrics.unreadable, 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = DispatchMetrics::new();
        metrics.record_unit();
        metrics.record_unit();
        metrics.record_call();
        metrics.record_success();
        metrics.record_malformed();
        metrics.record_alert();
        metrics.elapsed = Duration::from_millis(2500);

        let summary = metrics.summary();
        assert!(summary.contains("Units seen: 2"));
        assert!(summary.contains("Calls made: 1"));
        assert!(summary.contains("Malformed units: 1"));
        assert!(summary.contains("Alerts: 1"));
        assert!(summary.contains("Elapsed: 2.5s"));
        assert!(!summary.contains("Dry run"));
    }

    #[test]
    fn test_summary_hides_failure_breakdown_when_clean() {
        let metrics = DispatchMetrics::new();
        assert!(!metrics.summary().contains("Remote failures"));
    }
}
