//! Sift Enrichment Client Layer
//!
//! Implementations of the `EnrichmentService` trait from `sift-domain`.
//!
//! # Architecture
//!
//! The dispatcher is generic over `EnrichmentService`, so the HTTP client and
//! the scripted mock are interchangeable.
//!
//! # Services
//!
//! - `IdlClient`: InData Labs text API over HTTP
//! - `MockEnrichment`: Scripted, deterministic responses for testing
//!
//! # Examples
//!
//! ```
//! use sift_client::MockEnrichment;
//! use sift_domain::traits::EnrichmentService;
//!
//! # tokio_test_block_on(async {
//! let service = MockEnrichment::new();
//! service.push_success(&[("sports", 1.2)], Some(99));
//!
//! let enrichment = service.enrich("match report").await.unwrap();
//! assert_eq!(enrichment.units_left, Some(99));
//! assert_eq!(service.call_count(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod idl;

use serde_json::json;
use sift_domain::traits::EnrichmentService;
use sift_domain::{Enrichment, Outcome, ScoreMap};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::time::Instant;

pub use idl::{interpret_response, IdlClient, DEFAULT_ENDPOINT, INTERESTS_MODEL};

/// Errors that can occur while talking to the enrichment service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnrichmentError {
    /// Network or transport failure; the service was not reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Client could not be configured
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// A scripted response
#[derive(Debug, Clone)]
enum Scripted {
    Reply(Enrichment),
    Transport(String),
}

/// Mock enrichment service for deterministic testing
///
/// Responses are queued with the `push_*` methods and handed out in order.
/// Once the queue is empty every call succeeds with an empty score map and no
/// quota report. Calls are recorded with their payload and start time.
///
/// # Examples
///
/// ```
/// use sift_client::MockEnrichment;
///
/// let service = MockEnrichment::new();
/// service.push_failure(429, Some(10));
/// service.push_transport_error("connection refused");
/// assert_eq!(service.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEnrichment {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl MockEnrichment {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_success(&self, scores: &[(&str, f64)], units_left: Option<i64>) {
        let scores: ScoreMap = scores.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let raw = json!({
            "request": {"units_left": units_left},
            "response": [{"interests": scores}],
        });
        self.push(Scripted::Reply(Enrichment {
            outcome: Outcome::Success { scores, raw },
            units_left,
        }));
    }

    /// Queue an error-status response
    pub fn push_failure(&self, status: u16, units_left: Option<i64>) {
        let raw = json!({
            "request": {"units_left": units_left},
            "error": format!("mock error {}", status),
        });
        self.push(Scripted::Reply(Enrichment {
            outcome: Outcome::Failure {
                reason: format!("HTTP {}", status),
                status: Some(status),
                raw,
            },
            units_left,
        }));
    }

    /// Queue a transport failure
    pub fn push_transport_error(&self, message: impl Into<String>) {
        self.push(Scripted::Transport(message.into()));
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Payloads received, in call order
    pub fn payloads(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(text, _)| text.clone()).collect()
    }

    /// Start time of every call, in call order
    pub fn call_times(&self) -> Vec<Instant> {
        self.lock_calls().iter().map(|(_, at)| *at).collect()
    }

    /// Responses still queued
    pub fn remaining(&self) -> usize {
        self.lock_script().len()
    }

    fn push(&self, scripted: Scripted) {
        self.lock_script().push_back(scripted);
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, Instant)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EnrichmentService for MockEnrichment {
    type Error = EnrichmentError;

    async fn enrich(&self, text: &str) -> Result<Enrichment, Self::Error> {
        self.lock_calls().push((text.to_string(), Instant::now()));

        match self.lock_script().pop_front() {
            Some(Scripted::Reply(enrichment)) => Ok(enrichment),
            Some(Scripted::Transport(message)) => Err(EnrichmentError::Transport(message)),
            None => Ok(Enrichment {
                outcome: Outcome::Success {
                    scores: ScoreMap::new(),
                    raw: json!({"response": [{"interests": {}}]}),
                },
                units_left: None,
            }),
        }
    }
}
