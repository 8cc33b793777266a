//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sift_client::DEFAULT_ENDPOINT;
use sift_dispatcher::DispatchConfig;
use sift_extractor::{CorpusConfig, ExtractorConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "SIFT_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Corpus and results locations
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Payload size limits
    #[serde(default)]
    pub limits: ExtractorConfig,

    /// Quota, rate and alert settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Enrichment API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Enrichment API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Text API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; empty means "take it from SIFT_API_KEY"
    #[serde(default)]
    pub api_key: String,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sift").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.sift/config.toml` is
    /// used when present and the built-in defaults otherwise. `SIFT_API_KEY`
    /// overrides the file's key in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!("No config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace the API key when an override is given and non-empty.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api.api_key = key;
        }
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.corpus
            .validate()
            .map_err(|e| CliError::Config(format!("[corpus] {}", e)))?;
        self.limits
            .validate()
            .map_err(|e| CliError::Config(format!("[limits] {}", e)))?;
        self.dispatch
            .validate()
            .map_err(|e| CliError::Config(format!("[dispatch] {}", e)))?;

        if self.api.endpoint.is_empty() {
            return Err(CliError::Config("[api] endpoint must not be empty".into()));
        }
        if self.api.api_key.is_empty() && !self.dispatch.dry_run {
            return Err(CliError::Config(format!(
                "[api] api_key is not set (set it in the config file or {})",
                API_KEY_ENV
            )));
        }
        Ok(())
    }

    /// A copy safe to print: the API key is masked.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.api.api_key = mask_key(&self.api.api_key);
        copy
    }
}

/// Mask an API key, keeping only its last four characters.
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len == 0 {
        return "(not set)".to_string();
    }
    if len <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(len - 4).collect();
    format!("****{}", tail)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
