//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::fragments::extract_text;
use crate::limiter::PayloadLimiter;
use crate::types::PreparedUnit;
use sift_domain::WorkUnit;
use tracing::debug;

/// Turns work units into payloads ready for submission
///
/// Pure apart from logging: extraction then limiting, no I/O.
#[derive(Debug, Clone)]
pub struct Extractor {
    limiter: PayloadLimiter,
}

impl Extractor {
    /// Create a new Extractor
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            limiter: PayloadLimiter::new(config.max_payload_bytes),
        }
    }

    /// Extract and limit one unit
    pub fn prepare(&self, unit: &WorkUnit) -> Result<PreparedUnit, ExtractorError> {
        let text = extract_text(unit)?;
        let payload = self.limiter.limit(&unit.id, &text);

        debug!(
            "Prepared {}: {} bytes extracted, {} bytes to send",
            unit.id,
            text.len(),
            payload.byte_len()
        );

        Ok(PreparedUnit {
            id: unit.id.clone(),
            text,
            payload,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}
