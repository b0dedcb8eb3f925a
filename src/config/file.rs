// src/config/file.rs
// File-based configuration from ~/.support-triage/config.toml

use crate::error::{Result, TriageError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct TriageConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub validation: ValidationSection,
}

/// `[llm]` section
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct LlmSection {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

/// `[validation]` section
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ValidationSection {
    pub max_reply_chars: Option<usize>,
}

impl TriageConfig {
    /// Load config from ~/.support-triage/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read and parse a config file
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| TriageError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from an explicit path. Missing or unparsable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config from file");
                config
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config file");
                Self::default()
            }
        }
    }

    /// Directory holding config.toml and the user-level .env
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".support-triage")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
