// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use crate::config::file::TriageConfig;
use crate::fallback::FALLBACK_REPLY;
use crate::llm::provider::{DEFAULT_TEMPERATURE, Provider};
use crate::validation::{DEFAULT_MAX_REPLY_CHARS, ValidationRules};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default analysis timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend credentials loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
    /// OpenAI API key (OPENAI_API_KEY)
    pub openai: Option<String>,
    /// DeepSeek API key (DEEPSEEK_API_KEY)
    pub deepseek: Option<String>,
    /// Ollama base URL (OLLAMA_HOST)
    pub ollama_host: Option<String>,
}

impl ApiKeys {
    /// Read keys through `lookup`, filtering empty values
    ///
    /// `TRIAGE_DISABLE_LLM=1` suppresses every key, so every analysis falls back
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        if lookup("TRIAGE_DISABLE_LLM")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(false)
        {
            info!("TRIAGE_DISABLE_LLM is set, backends disabled");
            return Self::default();
        }

        let read_key = |name: &str| lookup(name).filter(|k| !k.trim().is_empty());
        let keys = Self {
            gemini: read_key("GEMINI_API_KEY").or_else(|| read_key("GOOGLE_API_KEY")),
            openai: read_key("OPENAI_API_KEY"),
            deepseek: read_key("DEEPSEEK_API_KEY"),
            ollama_host: read_key("OLLAMA_HOST"),
        };
        keys.log_status();
        keys
    }

    /// Load API keys from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Credential (or host, for Ollama) for a provider
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini.as_deref(),
            Provider::OpenAi => self.openai.as_deref(),
            Provider::DeepSeek => self.deepseek.as_deref(),
            Provider::Ollama => self.ollama_host.as_deref(),
        }
    }

    /// Providers with credentials, in preference order
    pub fn available(&self) -> Vec<Provider> {
        Provider::preference_order()
            .into_iter()
            .filter(|p| self.credential(*p).is_some())
            .collect()
    }

    pub fn has_llm_provider(&self) -> bool {
        !self.available().is_empty()
    }

    /// Get a summary of available providers
    pub fn summary(&self) -> String {
        let providers = self.available();
        if providers.is_empty() {
            "None".to_string()
        } else {
            providers
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Log which keys are available (without exposing values)
    fn log_status(&self) {
        if self.has_llm_provider() {
            debug!(providers = %self.summary(), "Backend credentials loaded");
        } else {
            warn!("No backend credentials configured - every analysis will fall back");
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Effective configuration: environment values layered over the config file
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    /// Backend choice (TRIAGE_PROVIDER or `[llm] provider`), kept raw for validation
    pub provider: Option<String>,
    /// Model override (TRIAGE_MODEL or `[llm] model`)
    pub model: Option<String>,
    /// Sampling temperature (TRIAGE_TEMPERATURE or `[llm] temperature`)
    pub temperature: f32,
    /// Analysis timeout (TRIAGE_TIMEOUT_SECS or `[llm] timeout_secs`)
    pub timeout: Duration,
    /// Reply bound (TRIAGE_MAX_REPLY_CHARS or `[validation] max_reply_chars`)
    pub max_reply_chars: usize,
    /// Values that were set but could not be parsed, as `NAME=value`
    pub unparsed: Vec<String>,
}

impl EnvConfig {
    /// Load all configuration from the process environment and config file
    pub fn load() -> Self {
        info!("Loading configuration");
        Self::from_sources(|name: &str| std::env::var(name).ok(), &TriageConfig::load())
    }

    /// Environment-only configuration through an injected lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_sources(lookup, &TriageConfig::default())
    }

    /// Layer `lookup` over `file`; a set environment value always wins
    pub fn from_sources(lookup: impl Fn(&str) -> Option<String>, file: &TriageConfig) -> Self {
        let mut unparsed = Vec::new();
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let temperature: Option<f32> =
            parse_value("TRIAGE_TEMPERATURE", read("TRIAGE_TEMPERATURE"), &mut unparsed);
        let timeout_secs: Option<u64> =
            parse_value("TRIAGE_TIMEOUT_SECS", read("TRIAGE_TIMEOUT_SECS"), &mut unparsed);
        let max_reply_chars: Option<usize> =
            parse_value("TRIAGE_MAX_REPLY_CHARS", read("TRIAGE_MAX_REPLY_CHARS"), &mut unparsed);

        let config = Self {
            api_keys: ApiKeys::from_lookup(&lookup),
            provider: read("TRIAGE_PROVIDER").or_else(|| file.llm.provider.clone()),
            model: read("TRIAGE_MODEL").or_else(|| file.llm.model.clone()),
            temperature: temperature
                .or(file.llm.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(
                timeout_secs
                    .or(file.llm.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_reply_chars: max_reply_chars
                .or(file.validation.max_reply_chars)
                .unwrap_or(DEFAULT_MAX_REPLY_CHARS),
            unparsed,
        };

        for entry in &config.unparsed {
            warn!(value = %entry, "Ignoring unparsable configuration value");
        }
        config
    }

    /// Backend to use: the configured one, or the first with credentials
    ///
    /// Returns None when the configured name is unknown or nothing is available.
    pub fn selected_provider(&self) -> Option<Provider> {
        match self.provider.as_deref() {
            Some(name) => Provider::from_str(name),
            None => self.api_keys.available().into_iter().next(),
        }
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::with_max_reply_chars(self.max_reply_chars)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        for entry in &self.unparsed {
            validation.add_error(format!("Could not parse {}", entry));
        }

        match self.provider.as_deref() {
            Some(name) => match Provider::from_str(name) {
                Some(provider) if self.api_keys.credential(provider).is_none() => {
                    validation.add_error(format!(
                        "Provider '{}' selected but {} is not set",
                        provider,
                        provider.api_key_env_var()
                    ));
                }
                Some(_) => {}
                None => validation.add_error(format!(
                    "Unknown provider '{}'. Valid options: gemini, openai, deepseek, ollama",
                    name
                )),
            },
            None if !self.api_keys.has_llm_provider() => {
                validation.add_warning(
                    "No backend configured. Set GEMINI_API_KEY, OPENAI_API_KEY, DEEPSEEK_API_KEY or OLLAMA_HOST; until then every analysis returns the fallback result.",
                );
            }
            None => {}
        }

        if self.timeout.is_zero() {
            validation.add_error("Timeout must be at least 1 second");
        }
        if self.max_reply_chars == 0 {
            validation.add_error("max_reply_chars must be greater than 0");
        } else if self.max_reply_chars < FALLBACK_REPLY.chars().count() {
            validation.add_warning(format!(
                "max_reply_chars {} is shorter than the fallback reply ({} chars)",
                self.max_reply_chars,
                FALLBACK_REPLY.chars().count()
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            validation.add_warning(format!(
                "Temperature {} is outside the usual 0.0-2.0 range",
                self.temperature
            ));
        }

        validation
    }
}

/// Parse a set value, recording it in `unparsed` when it does not parse
fn parse_value<T: FromStr>(name: &str, raw: Option<String>, unparsed: &mut Vec<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            unparsed.push(format!("{}={}", name, raw));
            None
        }
    }
}

/// Parse a boolean flag value (1/true/yes/on, 0/false/no/off)
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
