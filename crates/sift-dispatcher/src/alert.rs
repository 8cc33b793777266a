//! Significance alerts

use sift_domain::{significant_interests, ScoreMap, SignificantInterest, UnitId};
use std::fmt;
use tracing::warn;

/// A unit with at least one significant interest
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Unit the scores belong to
    pub unit: UnitId,

    /// Every interest at or above the threshold, in label order
    pub interests: Vec<SignificantInterest>,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.interests.iter().map(ToString::to_string).collect();
        write!(f, "{} has significant interests: [{}]", self.unit, pairs.join(", "))
    }
}

/// Evaluates score maps against the significance threshold
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluator {
    threshold: f64,
}

impl AlertEvaluator {
    /// Create an evaluator for the given threshold
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Threshold in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate one unit's scores
    ///
    /// Returns at most one alert per unit, listing every significant entry,
    /// and logs it. Returns `None` when every score is below the threshold.
    pub fn evaluate(&self, unit: &UnitId, scores: &ScoreMap) -> Option<Alert> {
        let interests = significant_interests(scores, self.threshold);
        if interests.is_empty() {
            return None;
        }

        let alert = Alert {
            unit: unit.clone(),
            interests,
        };
        warn!("{}", alert);
        Some(alert)
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(sift_domain::SIGNIFICANCE_THRESHOLD)
    }
}
