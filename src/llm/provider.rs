// src/llm/provider.rs
// LLM provider abstraction layer

use crate::error::TransportError;
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Low temperature keeps labels stable across calls
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// LLM provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    DeepSeek,
    Ollama,
}

impl Provider {
    /// Parse provider from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            "deepseek" => Some(Self::DeepSeek),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the environment variable name for this provider's credential
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::Ollama => "OLLAMA_HOST", // Ollama uses host, not API key
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::DeepSeek => "deepseek-chat",
            Self::Ollama => "llama3.3",
        }
    }

    /// Order used when no provider is configured explicitly
    pub fn preference_order() -> [Provider; 4] {
        [Self::Gemini, Self::OpenAi, Self::DeepSeek, Self::Ollama]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
            Self::DeepSeek => write!(f, "deepseek"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Trait for LLM backends - any client that can turn a prompt into raw text.
///
/// Implementations make exactly one outbound call per `complete` and never retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the prompt and return the model's raw text output
    async fn complete(&self, prompt: &Prompt) -> Result<String, TransportError>;

    /// Get the provider type
    fn provider_type(&self) -> Provider;

    /// Get the model name
    fn model_name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("Google"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("OPENAI"), Some(Provider::OpenAi));
        assert_eq!(Provider::from_str(" deepseek "), Some(Provider::DeepSeek));
        assert_eq!(Provider::from_str("ollama"), Some(Provider::Ollama));
        assert_eq!(Provider::from_str("claude"), None);
    }

    #[test]
    fn test_display_round_trips() {
        for p in Provider::preference_order() {
            assert_eq!(Provider::from_str(&p.to_string()), Some(p));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Provider::Gemini.default_model(), "gemini-2.5-flash");
        assert_eq!(Provider::Gemini.api_key_env_var(), "GEMINI_API_KEY");
        assert_eq!(Provider::Ollama.api_key_env_var(), "OLLAMA_HOST");
    }

    #[test]
    fn test_preference_order_starts_with_gemini() {
        assert_eq!(Provider::preference_order()[0], Provider::Gemini);
    }
}
