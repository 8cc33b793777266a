//! InData Labs text API client
//!
//! Scores text against the vendor's "interests" model.
//!
//! # Wire contract
//!
//! - `POST <endpoint>?apikey=<key>&models=interests`
//! - Body: `{"texts": ["<payload>"]}` (the API accepts several texts per
//!   call; this client always sends exactly one)
//! - Response: `{"request": {"units_left": N, ...}, "response": [{"interests": {...}}]}`
//!
//! Any non-2xx status is a failure outcome. The remaining-units counter is
//! read from every response that has one, failures included.
//!
//! # Examples
//!
//! ```no_run
//! use sift_client::IdlClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = IdlClient::new("https://api.indatalabs.com/v1/text", "secret")?;
//! let enrichment = client.enrich("Team won the championship last night").await?;
//! println!("units left: {:?}", enrichment.units_left);
//! # Ok(())
//! # }
//! ```

use crate::EnrichmentError;
use serde::Serialize;
use serde_json::Value;
use sift_domain::traits::EnrichmentService;
use sift_domain::{Enrichment, Outcome, ScoreMap};
use std::fmt;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.indatalabs.com/v1/text";

/// Model selector sent with every request
pub const INTERESTS_MODEL: &str = "interests";

/// Request body for the text API
#[derive(Serialize)]
struct TextRequest<'a> {
    texts: [&'a str; 1],
}

/// Client for the InData Labs text API
///
/// One call per payload, no retries. Transport failures are surfaced as
/// [`EnrichmentError::Transport`] for the caller to treat as fatal.
#[derive(Clone)]
pub struct IdlClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl IdlClient {
    /// Create a new client
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EnrichmentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Score one text payload
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Transport`] if the service cannot be
    /// reached or the response body cannot be read. A response with an error
    /// status is *not* an error here; it comes back as a failure outcome.
    pub async fn enrich(&self, text: &str) -> Result<Enrichment, EnrichmentError> {
        debug!("POST {} ({} bytes)", self.endpoint, text.len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("apikey", self.api_key.as_str()), ("models", INTERESTS_MODEL)])
            .json(&TextRequest { texts: [text] })
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Transport(format!("Failed to read response: {}", e)))?;

        debug!("Response HTTP {} ({} bytes)", status, body.len());

        Ok(interpret_response(status.as_u16(), &body))
    }
}

impl fmt::Debug for IdlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdlClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl EnrichmentService for IdlClient {
    type Error = EnrichmentError;

    async fn enrich(&self, text: &str) -> Result<Enrichment, Self::Error> {
        IdlClient::enrich(self, text).await
    }
}

/// Turn an HTTP status and body into an enrichment
///
/// Bodies that are not JSON are kept as a JSON string so they can still be
/// reported verbatim.
pub fn interpret_response(status: u16, body: &str) -> Enrichment {
    let raw: Value = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
    let units_left = units_left(&raw);

    let outcome = if !(200..300).contains(&status) {
        Outcome::Failure {
            reason: format!("HTTP {}", status),
            status: Some(status),
            raw,
        }
    } else {
        match interests(&raw) {
            Ok(scores) => Outcome::Success { scores, raw },
            Err(detail) => Outcome::Failure {
                reason: format!("invalid response: {}", detail),
                status: Some(status),
                raw,
            },
        }
    };

    Enrichment { outcome, units_left }
}

/// `request.units_left`, if present and numeric
fn units_left(raw: &Value) -> Option<i64> {
    let value = raw.pointer("/request/units_left")?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// `response[0].interests` as a score map
fn interests(raw: &Value) -> Result<ScoreMap, String> {
    let map = raw
        .pointer("/response/0/interests")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing response[0].interests".to_string())?;

    map.iter()
        .map(|(label, score)| {
            score
                .as_f64()
                .map(|s| (label.clone(), s))
                .ok_or_else(|| format!("non-numeric score for '{}'", label))
        })
        .collect()
}
