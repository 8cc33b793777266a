//! Outcome module - what the enrichment service said about a payload

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Score at or above which an interest is considered significant
pub const SIGNIFICANCE_THRESHOLD: f64 = 1.0;

/// Mapping of interest label to score
pub type ScoreMap = BTreeMap<String, f64>;

/// Result of one enrichment call
///
/// Both variants keep the raw response so it can be persisted or reported
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service scored the payload
    Success {
        /// Interest label → score
        scores: ScoreMap,
        /// Full response document
        raw: Value,
    },

    /// The service answered but did not score the payload
    Failure {
        /// Short description of why the call failed
        reason: String,
        /// HTTP status of the response, when there was one
        status: Option<u16>,
        /// Full response document (or the body text wrapped as a string)
        raw: Value,
    },
}

impl Outcome {
    /// Whether the outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Raw response document
    pub fn raw(&self) -> &Value {
        match self {
            Outcome::Success { raw, .. } | Outcome::Failure { raw, .. } => raw,
        }
    }

    /// Score map, for successful outcomes only
    pub fn scores(&self) -> Option<&ScoreMap> {
        match self {
            Outcome::Success { scores, .. } => Some(scores),
            Outcome::Failure { .. } => None,
        }
    }
}

/// An outcome together with the service's quota bookkeeping
///
/// `units_left` is authoritative whenever the service reports it, on
/// success and failure alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// What the service said about the payload
    pub outcome: Outcome,

    /// Remaining daily units as reported by the service
    pub units_left: Option<i64>,
}

/// A label whose score crossed the significance threshold
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantInterest {
    /// Interest label
    pub label: String,

    /// Score reported by the service
    pub score: f64,
}

impl fmt::Display for SignificantInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\", {}]", self.label, self.score)
    }
}

/// Select the entries of `scores` at or above `threshold`
///
/// Entries are returned in label order. NaN scores never qualify.
///
/// # Examples
///
/// ```
/// use sift_domain::{significant_interests, ScoreMap, SIGNIFICANCE_THRESHOLD};
///
/// let mut scores = ScoreMap::new();
/// scores.insert("sports".to_string(), 1.2);
/// scores.insert("finance".to_string(), 0.3);
///
/// let found = significant_interests(&scores, SIGNIFICANCE_THRESHOLD);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].label, "sports");
/// ```
pub fn significant_interests(scores: &ScoreMap, threshold: f64) -> Vec<SignificantInterest> {
    scores
        .iter()
        .filter(|(_, score)| **score >= threshold)
        .map(|(label, score)| SignificantInterest {
            label: label.clone(),
            score: *score,
        })
        .collect()
}
