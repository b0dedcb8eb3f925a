// src/llm/openai_compat/client.rs
// Chat-completions client for OpenAI, DeepSeek and local Ollama

use crate::error::TransportError;
use crate::http::create_shared_client;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::logging;
use crate::llm::openai_compat::request::ChatRequest;
use crate::llm::openai_compat::response::parse_chat_response;
use crate::llm::provider::{DEFAULT_TEMPERATURE, LlmClient, Provider};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, instrument, warn};
use uuid::Uuid;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";

/// Output cap; replies are one or two sentences wrapped in a small JSON object
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Normalize Ollama base URL by stripping trailing slashes and /v1 suffix
fn normalize_ollama_url(url: &str) -> String {
    let mut url = url.trim_end_matches('/').to_string();
    if url.ends_with("/v1") {
        url.truncate(url.len() - 3);
    }
    url
}

/// Check if a URL points to a local address (localhost, 127.0.0.1, [::1])
fn is_local_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host() {
            Some(url::Host::Domain(d)) => d == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => true,
        },
        Err(_) => true, // Can't parse, don't warn on malformed URLs
    }
}

/// OpenAI-compatible chat completions client
pub struct OpenAiCompatClient {
    provider: Provider,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    json_mode: bool,
    http: LlmHttpClient,
}

impl OpenAiCompatClient {
    fn build(provider: Provider, base_url: String, api_key: Option<String>) -> Self {
        Self {
            provider,
            base_url,
            api_key,
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            json_mode: provider != Provider::Ollama,
            http: LlmHttpClient::from_client(create_shared_client()),
        }
    }

    pub fn openai(api_key: String) -> Self {
        Self::build(Provider::OpenAi, OPENAI_API_BASE.to_string(), Some(api_key))
    }

    pub fn deepseek(api_key: String) -> Self {
        Self::build(Provider::DeepSeek, DEEPSEEK_API_BASE.to_string(), Some(api_key))
    }

    /// Local Ollama through its OpenAI-compatible endpoint (no auth)
    pub fn ollama(host: String) -> Self {
        let base = normalize_ollama_url(&host);
        if !is_local_url(&base) {
            warn!(
                "OLLAMA_HOST points to non-local address '{}'. Customer messages will leave this machine.",
                base
            );
        }
        Self::build(Provider::Ollama, format!("{}/v1", base), None)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &Prompt) -> ChatRequest {
        ChatRequest::from_prompt(self.model.clone(), prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(MAX_OUTPUT_TOKENS)
            .with_json_mode(self.json_mode)
    }

    async fn call(&self, request_id: &str, prompt: &Prompt) -> Result<String, TransportError> {
        let body = serde_json::to_string(&self.build_request(prompt))
            .map_err(|e| TransportError::Network(format!("failed to encode request: {}", e)))?;
        let provider_name = self.provider.to_string();
        logging::log_request_body(request_id, &provider_name, &body);

        let response_body = self
            .http
            .execute_json(request_id, &self.endpoint(), self.api_key.as_deref(), body)
            .await?;

        let (content, usage) = parse_chat_response(&response_body)?;
        if let Some(u) = usage {
            debug!(
                request_id = %request_id,
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "{} usage stats", provider_name
            );
        }
        Ok(content)
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider_type(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }

    #[instrument(skip(self, prompt), fields(request_id, provider = %self.provider, model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        let provider_name = self.provider.to_string();
        logging::log_request(
            &request_id,
            &provider_name,
            &self.model,
            prompt.system.len() + prompt.user.len(),
        );

        let result = self.call(&request_id, prompt).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => logging::log_completion(&request_id, &provider_name, duration_ms, text.len()),
            Err(e) => logging::log_transport_failure(&request_id, &provider_name, duration_ms, e),
        }
        result
    }
}
