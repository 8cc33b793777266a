//! Types produced by the Extractor

use sift_domain::{Payload, UnitId};

/// A unit that made it through extraction and limiting
#[derive(Debug, Clone)]
pub struct PreparedUnit {
    /// Identifier of the unit
    pub id: UnitId,

    /// Full extracted text, before limiting
    pub text: String,

    /// Text to submit
    pub payload: Payload,
}

impl PreparedUnit {
    /// Whether the payload had to be truncated
    pub fn was_truncated(&self) -> bool {
        self.payload.truncated
    }
}
