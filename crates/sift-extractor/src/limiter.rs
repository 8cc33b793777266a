//! Payload size enforcement
//!
//! The limit is checked against the UTF-8 encoded length of the text, but a
//! text that is too long is cut at a *character* index equal to the byte
//! limit. With multi-byte characters the result can therefore still exceed
//! the byte budget. Downstream consumers depend on this cut point, so it is
//! kept as is.

use sift_domain::{Payload, UnitId};
use tracing::info;

/// Length of `text` in UTF-8 encoded bytes
pub fn utf8_len(text: &str) -> usize {
    text.len()
}

/// Apply the limit to `text`, returning the (possibly shortened) text and
/// whether it was shortened
///
/// # Examples
///
/// ```
/// use sift_extractor::truncate_to_limit;
///
/// assert_eq!(truncate_to_limit("abc", 2), ("ab".to_string(), true));
/// assert_eq!(truncate_to_limit("abc", 3), ("abc".to_string(), false));
///
/// // "é" is two bytes: over the byte budget, cut after two characters
/// assert_eq!(truncate_to_limit("éé", 2), ("éé".to_string(), true));
/// ```
pub fn truncate_to_limit(text: &str, max_bytes: usize) -> (String, bool) {
    if utf8_len(text) <= max_bytes {
        return (text.to_string(), false);
    }

    let cut = text
        .char_indices()
        .nth(max_bytes)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    (text[..cut].to_string(), true)
}

/// Enforces the maximum payload size for every unit of a run
#[derive(Debug, Clone, Copy)]
pub struct PayloadLimiter {
    max_bytes: usize,
}

impl PayloadLimiter {
    /// Create a limiter for the given byte budget
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Configured byte budget
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Limit the text extracted from `unit`
    ///
    /// Logs a notice naming the unit when truncation happens.
    pub fn limit(&self, unit: &UnitId, text: &str) -> Payload {
        let (limited, truncated) = truncate_to_limit(text, self.max_bytes);

        if truncated {
            info!(
                "Truncating {}: {} bytes exceeds limit of {}",
                unit,
                utf8_len(text),
                self.max_bytes
            );
            Payload::truncated(limited)
        } else {
            Payload::intact(limited)
        }
    }
}
