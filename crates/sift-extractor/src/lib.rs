//! Sift Extractor
//!
//! Reads work units from the corpus and turns them into payloads that fit
//! the enrichment service's request size.
//!
//! # Overview
//!
//! Each unit is a JSON array of message fragments. The extractor joins the
//! fragment texts into one string, then the payload limiter enforces the
//! configured byte budget.
//!
//! # Architecture
//!
//! ```text
//! CorpusWalker → WorkUnit → fragments → text → PayloadLimiter → Payload
//! ```
//!
//! # Key Features
//!
//! - **Fragment decoding**: Strict JSON decoding with per-unit errors
//! - **Byte budget**: Limit measured in UTF-8 bytes, cut at a character index
//! - **Lazy corpus walk**: Directory tree scanned once, files read one by one
//!
//! # Example Usage
//!
//! ```
//! use sift_domain::{UnitId, WorkUnit};
//! use sift_extractor::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(&ExtractorConfig::new(2));
//! let unit = WorkUnit::in_memory(
//!     UnitId::new("acme", "chat.json"),
//!     r#"[{"message": "ab"}, {"message": "c"}]"#,
//! );
//!
//! let prepared = extractor.prepare(&unit).unwrap();
//! assert_eq!(prepared.text, "abc");
//! assert_eq!(prepared.payload.text, "ab");
//! assert!(prepared.payload.truncated);
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod fragments;
mod limiter;
mod walker;
mod extractor;

#[cfg(test)]
mod tests;

pub use error::ExtractorError;
pub use config::{CorpusConfig, ExtractorConfig};
pub use types::PreparedUnit;
pub use fragments::{extract_text, parse_fragments, MESSAGE_FIELD};
pub use limiter::{truncate_to_limit, utf8_len, PayloadLimiter};
pub use walker::CorpusWalker;
pub use extractor::Extractor;
