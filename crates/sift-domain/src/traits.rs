//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the dispatch loop and
//! infrastructure. Implementations live in other crates.

use crate::{Enrichment, Outcome, UnitId};
use std::future::Future;

/// A metered remote service that scores one text payload per call
///
/// Implemented by the infrastructure layer (sift-client)
///
/// A call either reaches the service and yields an [`Enrichment`] (whose
/// outcome may itself be a failure reported by the service), or it cannot
/// reach the service at all and yields `Err`. Callers treat `Err` as fatal
/// for the run: there is no retry policy.
pub trait EnrichmentService {
    /// Error type for transport-level failures
    type Error: std::fmt::Display;

    /// Submit exactly one text payload for scoring
    fn enrich(&self, text: &str) -> impl Future<Output = Result<Enrichment, Self::Error>> + Send;
}

/// Persists the outcome of a unit
///
/// Implemented by the dispatcher crate (file sink) and by test doubles
pub trait ResultSink {
    /// Error type for persistence failures
    type Error: std::fmt::Display;

    /// Persist an outcome together with the text it was computed from
    fn persist(&mut self, unit: &UnitId, outcome: &Outcome, text: &str) -> Result<(), Self::Error>;
}
