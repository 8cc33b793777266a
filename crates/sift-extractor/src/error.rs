//! Error types for the Extractor

use sift_domain::UnitId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and preparing work units
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The unit source is not a JSON array of message fragments
    #[error("Malformed unit {unit}: {detail}")]
    MalformedUnit {
        /// Unit that could not be decoded
        unit: UnitId,
        /// What was wrong with it
        detail: String,
    },

    /// The unit file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The corpus directory could not be walked
    #[error("Corpus walk error: {0}")]
    Walk(String),
}

impl ExtractorError {
    /// Build a malformed-unit error
    pub fn malformed(unit: &UnitId, detail: impl Into<String>) -> Self {
        ExtractorError::MalformedUnit {
            unit: unit.clone(),
            detail: detail.into(),
        }
    }
}
