// src/llm/factory.rs
// Provider factory: turns configuration into one ready LlmClient

use crate::config::{ApiKeys, EnvConfig};
use crate::error::TransportError;
use crate::llm::gemini::GeminiClient;
use crate::llm::openai_compat::OpenAiCompatClient;
use crate::llm::provider::{LlmClient, Provider};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Stand-in backend used when no credentials are configured.
///
/// Every call fails with `Auth`, so the analyzer still returns the fallback result.
pub struct UnconfiguredClient {
    provider: Provider,
}

impl UnconfiguredClient {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl LlmClient for UnconfiguredClient {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, TransportError> {
        Err(TransportError::Auth(format!(
            "no credentials configured ({} not set)",
            self.provider.api_key_env_var()
        )))
    }

    fn provider_type(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> String {
        "none".to_string()
    }
}

/// Factory for creating the configured LLM client
pub struct ProviderFactory {
    client: Option<Arc<dyn LlmClient>>,
    provider: Option<Provider>,
}

impl ProviderFactory {
    /// Create a factory from loaded configuration
    pub fn from_config(config: &EnvConfig) -> Self {
        let provider = config.selected_provider();
        let client = provider.and_then(|p| {
            Self::create_client(p, &config.api_keys, config.model.as_deref(), config.temperature)
        });

        match (&client, provider) {
            (Some(c), _) => {
                info!(provider = %c.provider_type(), model = %c.model_name(), "LLM backend initialized")
            }
            (None, Some(p)) => warn!(provider = %p, "Configured provider has no credentials"),
            (None, None) => warn!("No LLM backend available"),
        }

        Self { client, provider }
    }

    /// Build a client for `provider` if its credential is present
    pub fn create_client(
        provider: Provider,
        api_keys: &ApiKeys,
        model: Option<&str>,
        temperature: f32,
    ) -> Option<Arc<dyn LlmClient>> {
        let credential = api_keys.credential(provider)?.to_string();
        let model = model
            .map(str::to_string)
            .unwrap_or_else(|| provider.default_model().to_string());

        let client: Arc<dyn LlmClient> = match provider {
            Provider::Gemini => {
                Arc::new(GeminiClient::with_model(credential, model).with_temperature(temperature))
            }
            Provider::OpenAi => Arc::new(
                OpenAiCompatClient::openai(credential)
                    .with_model(model)
                    .with_temperature(temperature),
            ),
            Provider::DeepSeek => Arc::new(
                OpenAiCompatClient::deepseek(credential)
                    .with_model(model)
                    .with_temperature(temperature),
            ),
            Provider::Ollama => Arc::new(
                OpenAiCompatClient::ollama(credential)
                    .with_model(model)
                    .with_temperature(temperature),
            ),
        };
        Some(client)
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// The configured client, or an `UnconfiguredClient` when none is available
    pub fn client(&self) -> Arc<dyn LlmClient> {
        match &self.client {
            Some(client) => client.clone(),
            None => Arc::new(UnconfiguredClient::new(
                self.provider.unwrap_or(Provider::Gemini),
            )),
        }
    }
}
