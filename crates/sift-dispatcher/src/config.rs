//! Configuration for dispatch runs
//!
//! Defines the starting quota, the request rate and the alert threshold.

use serde::{Deserialize, Serialize};
use sift_domain::SIGNIFICANCE_THRESHOLD;
use std::time::Duration;

/// Configuration for the dispatcher
///
/// # Examples
///
/// ```
/// use sift_dispatcher::DispatchConfig;
/// use std::time::Duration;
///
/// let config = DispatchConfig::default();
/// assert_eq!(config.max_requests_per_minute, 30);
/// assert_eq!(config.min_interval(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// API units available at run start
    /// Default: 1000 (the vendor's daily allowance on the entry plan)
    #[serde(default = "default_starting_units")]
    pub starting_units: u64,

    /// Hard per-minute request limit of the service
    /// Default: 30
    #[serde(default = "default_max_requests_per_minute")]
    pub max_requests_per_minute: u32,

    /// Score at or above which an interest raises an alert
    /// Default: 1.0
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,

    /// Dry-run mode: extract and limit every unit but send nothing
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

fn default_starting_units() -> u64 {
    1000
}

fn default_max_requests_per_minute() -> u32 {
    30
}

fn default_significance_threshold() -> f64 {
    SIGNIFICANCE_THRESHOLD
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            starting_units: default_starting_units(),
            max_requests_per_minute: default_max_requests_per_minute(),
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            dry_run: false,
        }
    }
}

impl DispatchConfig {
    /// Minimum spacing between the end of one call and the start of the next
    ///
    /// `60 / max_requests_per_minute` seconds. Zero when the rate is not set,
    /// which `validate` rejects.
    pub fn min_interval(&self) -> Duration {
        if self.max_requests_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(60.0 / f64::from(self.max_requests_per_minute))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests_per_minute == 0 {
            return Err("max_requests_per_minute must be greater than 0".to_string());
        }
        if !self.significance_threshold.is_finite() {
            return Err("significance_threshold must be a finite number".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert_eq!(config.starting_units, 1000);
        assert_eq!(config.max_requests_per_minute, 30);
        assert_eq!(config.significance_threshold, 1.0);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_interval() {
        let config = DispatchConfig {
            max_requests_per_minute: 60,
            ..Default::default()
        };
        assert_eq!(config.min_interval(), Duration::from_secs(1));

        let config = DispatchConfig {
            max_requests_per_minute: 7,
            ..Default::default()
        };
        assert!(config.min_interval() >= Duration::from_millis(8571));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = DispatchConfig {
            max_requests_per_minute: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = DispatchConfig {
            significance_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"starting_units": 5, "max_requests_per_minute": 10}"#).unwrap();
        assert_eq!(config.starting_units, 5);
        assert_eq!(config.significance_threshold, 1.0);
        assert!(!config.dry_run);
    }
}
