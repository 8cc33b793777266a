//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Payload size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum payload size in UTF-8 bytes before truncation kicks in
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl ExtractorConfig {
    /// Create a configuration with the given payload limit
    pub fn new(max_payload_bytes: usize) -> Self {
        Self { max_payload_bytes }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_payload_bytes == 0 {
            return Err("max_payload_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// The vendor accepts up to 10 000 bytes per text
fn default_max_payload_bytes() -> usize {
    10_000
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

/// Where the corpus lives and where results go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Root of the corpus; each sub-directory is one entity collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory result records are written to
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// File extension of unit files (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_extension() -> String {
    "json".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
            extension: default_extension(),
        }
    }
}

impl CorpusConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        if self.results_dir.as_os_str().is_empty() {
            return Err("results_dir must not be empty".to_string());
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err("extension must be non-empty and given without a leading dot".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(CorpusConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_payload_bytes() {
        let config = ExtractorConfig::new(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_extension() {
        let config = CorpusConfig {
            extension: ".json".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::new(2048);
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.max_payload_bytes, 2048);
    }

    #[test]
    fn test_corpus_defaults_fill_missing_fields() {
        let config: CorpusConfig = toml::from_str(r#"data_dir = "corpus""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("corpus"));
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.extension, "json");
    }
}
