//! Batch dispatch loop
//!
//! Pulls units one at a time and walks each through
//! `Extracting → Limiting → QuotaCheck → RateGate → Calling → Routing`.
//! Per-unit errors are reported and the loop moves on. Quota exhaustion and
//! transport faults end the run.

use crate::alert::{Alert, AlertEvaluator};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::limiter::QuotaGatedLimiter;
use crate::metrics::DispatchMetrics;
use sift_domain::traits::{EnrichmentService, ResultSink};
use sift_domain::{Outcome, RunId, UnitId, WorkUnit};
use sift_extractor::{Extractor, ExtractorError, PreparedUnit};
use std::fmt;
use tokio::time::Instant;
use tracing::{error, info, trace};

/// Where the dispatcher is in its per-unit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Waiting for the next unit
    Idle,
    /// Decoding fragments
    Extracting,
    /// Enforcing the payload size
    Limiting,
    /// Checking units left
    QuotaCheck,
    /// Waiting out the call spacing
    RateGate,
    /// Request in flight
    Calling,
    /// Handing the outcome to the sink or the error report
    Routing,
    /// Terminal: no units left
    QuotaExhausted,
    /// Terminal: service unreachable
    TransportFault,
    /// Terminal: corpus exhausted
    Done,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every unit was visited
    Completed,
    /// The quota ran out before the corpus did
    QuotaExhausted,
    /// The service could not be reached
    TransportFault,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Completed => "completed",
            StopReason::QuotaExhausted => "quota exhausted",
            StopReason::TransportFault => "transport fault",
        };
        write!(f, "{}", s)
    }
}

/// Kind of per-unit failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Source could not be read
    Unreadable,
    /// Source could not be decoded into fragments
    Malformed,
    /// The service answered with a failure
    Remote,
    /// The outcome could not be persisted
    Sink,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Unreadable => "unreadable",
            FailureKind::Malformed => "malformed",
            FailureKind::Remote => "remote",
            FailureKind::Sink => "sink",
        };
        write!(f, "{}", s)
    }
}

/// A per-unit failure, kept for the run report
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    /// Unit identifier, or the path when the unit could not be read
    pub unit: String,
    /// What went wrong
    pub kind: FailureKind,
    /// Raw detail (error message or response body)
    pub detail: String,
}

impl UnitFailure {
    /// Whether this failure belongs to `unit`
    pub fn is_for(&self, unit: &UnitId) -> bool {
        self.unit == unit.to_string()
    }
}

/// Everything a run produced besides the persisted records
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier of the run
    pub run_id: RunId,
    /// Why the run ended
    pub stop_reason: StopReason,
    /// The run-level error, when the run did not complete
    pub error: Option<DispatchError>,
    /// Units left when the run ended
    pub units_left: u64,
    /// Counters
    pub metrics: DispatchMetrics,
    /// Per-unit failures, in processing order
    pub failures: Vec<UnitFailure>,
    /// Alerts raised, in processing order
    pub alerts: Vec<Alert>,
}

impl RunReport {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            stop_reason: StopReason::Completed,
            error: None,
            units_left: 0,
            metrics: DispatchMetrics::new(),
            failures: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// The run-level outcome as a `Result`
    pub fn result(&self) -> Result<(), DispatchError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Generate a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Run {} ended: {}\nUnits left: {}\n{}",
            self.run_id,
            self.stop_reason,
            self.units_left,
            self.metrics.summary()
        )
    }
}

/// Batch dispatcher
///
/// Owns the run's quota and rate state; processes units strictly in the
/// order given, one at a time.
///
/// # Examples
///
/// ```
/// use sift_client::MockEnrichment;
/// use sift_dispatcher::{DispatchConfig, Dispatcher, FileResultSink, StopReason};
/// use sift_domain::{UnitId, WorkUnit};
/// use sift_extractor::Extractor;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let results = std::env::temp_dir().join("sift-doc-results");
/// let service = MockEnrichment::new();
/// service.push_success(&[("sports", 1.2)], Some(0));
///
/// let mut dispatcher = Dispatcher::new(
///     service,
///     FileResultSink::new(&results),
///     Extractor::default(),
///     &DispatchConfig::default(),
/// );
///
/// let units = vec![Ok(WorkUnit::in_memory(
///     UnitId::new("acme", "chat.json"),
///     r#"[{"message": "what a goal"}]"#,
/// ))];
///
/// let report = dispatcher.run(units).await;
/// assert_eq!(report.stop_reason, StopReason::Completed);
/// assert_eq!(report.alerts.len(), 1);
/// # });
/// ```
pub struct Dispatcher<E, S> {
    service: E,
    sink: S,
    extractor: Extractor,
    limiter: QuotaGatedLimiter,
    alerts: AlertEvaluator,
    dry_run: bool,
    state: DispatchState,
    run_id: RunId,
}

impl<E, S> Dispatcher<E, S>
where
    E: EnrichmentService,
    S: ResultSink,
{
    /// Create a dispatcher for one run
    pub fn new(service: E, sink: S, extractor: Extractor, config: &DispatchConfig) -> Self {
        Self {
            service,
            sink,
            extractor,
            limiter: QuotaGatedLimiter::new(config.starting_units, config.min_interval()),
            alerts: AlertEvaluator::new(config.significance_threshold),
            dry_run: config.dry_run,
            state: DispatchState::Idle,
            run_id: RunId::new(),
        }
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Current state
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Units the run may still spend
    pub fn units_left(&self) -> u64 {
        self.limiter.units_left()
    }

    /// Process `units` until the corpus or the quota runs out
    ///
    /// Never fails: run-level errors end the loop and are recorded in the
    /// report's `stop_reason` and `error`.
    pub async fn run<I>(&mut self, units: I) -> RunReport
    where
        I: IntoIterator<Item = Result<WorkUnit, ExtractorError>>,
    {
        let started = Instant::now();
        let mut report = RunReport::new(self.run_id);

        info!(
            "Run {} starting: {} units available, {:?} between calls{}",
            self.run_id,
            self.limiter.units_left(),
            self.limiter.min_interval(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        for item in units {
            // Nothing is pulled once the quota is gone
            if !self.dry_run {
                self.transition(DispatchState::QuotaCheck);
                if let Err(e) = self.limiter.try_acquire() {
                    self.halt(&mut report, e);
                    break;
                }
            }

            report.metrics.record_unit();

            let unit = match item {
                Ok(unit) => unit,
                Err(e) => {
                    self.report_unit_error(&mut report, e);
                    continue;
                }
            };

            match self.process(&unit, &mut report).await {
                Ok(()) => self.transition(DispatchState::Idle),
                Err(e) => {
                    self.halt(&mut report, e);
                    break;
                }
            }
        }

        if report.error.is_none() {
            self.transition(DispatchState::Done);
        }

        report.units_left = self.limiter.units_left();
        report.metrics.elapsed = started.elapsed();
        info!("{}", report.summary());
        report
    }

    /// Walk one unit through the cycle
    ///
    /// Per-unit problems are reported here and yield `Ok`; only run-level
    /// errors are returned.
    async fn process(&mut self, unit: &WorkUnit, report: &mut RunReport) -> Result<(), DispatchError> {
        self.transition(DispatchState::Extracting);
        self.transition(DispatchState::Limiting);
        let prepared = match self.extractor.prepare(unit) {
            Ok(prepared) => prepared,
            Err(e) => {
                self.report_unit_error(report, e);
                return Ok(());
            }
        };
        if prepared.was_truncated() {
            report.metrics.record_truncation();
        }

        if self.dry_run {
            info!(
                "DRY RUN: would send {} bytes for {}",
                prepared.payload.byte_len(),
                prepared.id
            );
            report.metrics.record_dry_run();
            return Ok(());
        }

        self.transition(DispatchState::QuotaCheck);
        self.limiter.try_acquire()?;

        self.transition(DispatchState::RateGate);
        self.limiter.wait_turn().await;

        self.transition(DispatchState::Calling);
        report.metrics.record_call();
        let result = self.service.enrich(&prepared.payload.text).await;
        self.limiter.mark_called();

        let enrichment = result.map_err(|e| DispatchError::TransportFault {
            unit: prepared.id.clone(),
            detail: e.to_string(),
        })?;
        self.limiter.record_result(enrichment.units_left);

        self.transition(DispatchState::Routing);
        self.route(&prepared, &enrichment.outcome, report);
        Ok(())
    }

    /// Hand a successful outcome to the sink and alerts, report a failure
    fn route(&mut self, prepared: &PreparedUnit, outcome: &Outcome, report: &mut RunReport) {
        match outcome {
            Outcome::Success { scores, .. } => {
                match self.sink.persist(&prepared.id, outcome, &prepared.text) {
                    Ok(()) => report.metrics.record_success(),
                    Err(e) => {
                        error!("Failed to persist {}: {}", prepared.id, e);
                        report.metrics.record_sink_failure();
                        report.failures.push(UnitFailure {
                            unit: prepared.id.to_string(),
                            kind: FailureKind::Sink,
                            detail: e.to_string(),
                        });
                    }
                }

                if let Some(alert) = self.alerts.evaluate(&prepared.id, scores) {
                    report.metrics.record_alert();
                    report.alerts.push(alert);
                }
            }
            Outcome::Failure { reason, raw, .. } => {
                error!("Error processing {}: {}", prepared.id, reason);
                error!("Error: {}", raw);
                report.metrics.record_remote_failure();
                report.failures.push(UnitFailure {
                    unit: prepared.id.to_string(),
                    kind: FailureKind::Remote,
                    detail: format!("{}: {}", reason, raw),
                });
            }
        }
    }

    /// End the run on a run-level error
    fn halt(&mut self, report: &mut RunReport, e: DispatchError) {
        report.stop_reason = match e {
            DispatchError::QuotaExhausted => {
                self.transition(DispatchState::QuotaExhausted);
                error!("API units exhausted, stopping run");
                StopReason::QuotaExhausted
            }
            DispatchError::TransportFault { .. } => {
                self.transition(DispatchState::TransportFault);
                error!("{}", e);
                StopReason::TransportFault
            }
        };
        report.error = Some(e);
    }

    fn report_unit_error(&mut self, report: &mut RunReport, e: ExtractorError) {
        let (unit, kind) = match &e {
            ExtractorError::MalformedUnit { unit, .. } => (unit.to_string(), FailureKind::Malformed),
            ExtractorError::Io { path, .. } => (path.display().to_string(), FailureKind::Unreadable),
            ExtractorError::Walk(_) => {
                (String::new(), FailureKind::Unreadable)
            }
        };

        error!("Skipping {}: {}", if unit.is_empty() { "unit" } else { unit.as_str() }, e);
        match kind {
            FailureKind::Malformed => report.metrics.record_malformed(),
            _ => report.metrics.record_unreadable(),
        }
        report.failures.push(UnitFailure {
            unit,
            kind,
            detail: e.to_string(),
        });
        self.transition(DispatchState::Idle);
    }

    fn transition(&mut self, next: DispatchState) {
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
