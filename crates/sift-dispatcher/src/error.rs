//! Error types for dispatch operations

use sift_domain::UnitId;
use std::path::PathBuf;
use thiserror::Error;

/// Run-level errors: any of these ends the dispatch loop
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No API units left; no further request may be issued
    #[error("API units exhausted")]
    QuotaExhausted,

    /// The enrichment service could not be reached
    #[error("Transport fault while processing {unit}: {detail}")]
    TransportFault {
        /// Unit whose call failed
        unit: UnitId,
        /// Underlying transport error
        detail: String,
    },
}

/// Errors raised while persisting a result
#[derive(Error, Debug)]
pub enum SinkError {
    /// Result file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Response could not be rendered
    #[error("Failed to render response: {0}")]
    Render(String),
}
