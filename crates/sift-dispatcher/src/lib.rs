//! Sift Dispatcher
//!
//! Drives a batch run: every work unit is extracted, limited, checked against
//! the remaining quota, paced, sent to the enrichment service, and its
//! outcome routed to the result sink and the alert evaluator.
//!
//! # Overview
//!
//! The Dispatcher is responsible for:
//! - **Quota accounting**: No call is issued once the service reports zero units left
//! - **Pacing**: Calls are spaced at least `60 / max_requests_per_minute` seconds apart
//! - **Partial failure**: A failing unit is reported and the run moves on
//! - **Persistence**: Successful outcomes are written as human-readable records
//! - **Alerts**: Units with interests scoring at or above 1.0 are flagged
//!
//! # Run lifecycle
//!
//! | Stage        | On problem                                  |
//! |--------------|---------------------------------------------|
//! | Extracting   | Malformed unit: report, next unit           |
//! | Limiting     | Truncation: informational only              |
//! | QuotaCheck   | No units left: stop the run                 |
//! | RateGate     | Waits, never fails                          |
//! | Calling      | Transport fault: stop the run               |
//! | Routing      | Remote failure or sink error: report, next  |
//!
//! # Usage
//!
//! ```no_run
//! use sift_client::IdlClient;
//! use sift_dispatcher::{DispatchConfig, Dispatcher, FileResultSink};
//! use sift_extractor::{CorpusWalker, CorpusConfig, Extractor, ExtractorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let corpus = CorpusConfig::default();
//!     let client = IdlClient::new(sift_client::DEFAULT_ENDPOINT, "api-key")?;
//!     let mut dispatcher = Dispatcher::new(
//!         client,
//!         FileResultSink::new(&corpus.results_dir),
//!         Extractor::new(&ExtractorConfig::default()),
//!         &DispatchConfig::default(),
//!     );
//!
//!     let report = dispatcher.run(CorpusWalker::scan(&corpus)?).await;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [dispatch]
//! starting_units = 1000
//! max_requests_per_minute = 30
//! significance_threshold = 1.0
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod metrics;
mod limiter;
mod alert;
mod sink;
mod dispatcher;

pub use error::{DispatchError, SinkError};
pub use config::DispatchConfig;
pub use metrics::DispatchMetrics;
pub use limiter::QuotaGatedLimiter;
pub use alert::{Alert, AlertEvaluator};
pub use sink::{render_record, FileResultSink, RESULT_SUFFIX};
pub use dispatcher::{
    DispatchState, Dispatcher, FailureKind, RunReport, StopReason, UnitFailure,
};
