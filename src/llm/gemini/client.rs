// src/llm/gemini/client.rs
// Google Gemini API client (non-streaming, JSON response mode)
// The prompt's system part goes into systemInstruction, the message into contents

use crate::error::TransportError;
use crate::http::create_shared_client;
use crate::llm::gemini::extraction::{describe_empty, extract_text};
use crate::llm::gemini::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::llm::http_client::{LlmHttpClient, check_status, excerpt};
use crate::llm::logging;
use crate::llm::provider::{DEFAULT_TEMPERATURE, LlmClient, Provider};
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Instant;
use tracing::{Span, debug, instrument};
use uuid::Uuid;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    http: LlmHttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        Self::with_http_client(api_key, model, create_shared_client())
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            http: LlmHttpClient::from_client(client),
        }
    }

    /// Point the client at a different API base (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, prompt: &Prompt) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::text(Some("user"), prompt.user.clone())],
            system_instruction: Some(GeminiContent::text(None, prompt.system.clone())),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    async fn call(&self, request_id: &str, prompt: &Prompt) -> Result<String, TransportError> {
        let body = serde_json::to_string(&self.build_request(prompt))
            .map_err(|e| TransportError::Network(format!("failed to encode request: {}", e)))?;
        logging::log_request_body(request_id, "Gemini", &body);

        // Gemini takes its key in x-goog-api-key, not a Bearer header
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let (status, text) = self
            .http
            .send_once(request_id, body, |client, body| {
                client
                    .post(&url)
                    .header("x-goog-api-key", self.api_key.as_str())
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        // Invalid keys come back as 400 rather than 401
        if status == StatusCode::BAD_REQUEST && text.contains("API_KEY_INVALID") {
            return Err(TransportError::Auth(format!(
                "HTTP {}: {}",
                status,
                excerpt(&text)
            )));
        }
        let text = check_status(status, text)?;

        let data: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            TransportError::EmptyResponse(format!("undecodable Gemini response: {}", e))
        })?;

        if let Some(ref u) = data.usage_metadata {
            debug!(
                request_id = %request_id,
                prompt_tokens = u.prompt_token_count,
                completion_tokens = u.candidates_token_count.unwrap_or(0),
                total_tokens = u.total_token_count,
                "Gemini usage stats"
            );
        }

        extract_text(&data).ok_or_else(|| TransportError::EmptyResponse(describe_empty(&data)))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }

    #[instrument(skip(self, prompt), fields(request_id, model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        logging::log_request(
            &request_id,
            "Gemini",
            &self.model,
            prompt.system.len() + prompt.user.len(),
        );

        let result = self.call(&request_id, prompt).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => logging::log_completion(&request_id, "Gemini", duration_ms, text.len()),
            Err(e) => logging::log_transport_failure(&request_id, "Gemini", duration_ms, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt {
            system: "rules".to_string(),
            user: "message".to_string(),
        }
    }

    // ============================================================================
    // Constants tests
    // ============================================================================

    #[test]
    fn test_default_model() {
        assert_eq!(DEFAULT_MODEL, "gemini-2.5-flash");
        assert_eq!(DEFAULT_MODEL, Provider::Gemini.default_model());
    }

    #[test]
    fn test_api_base() {
        assert!(GEMINI_API_BASE.contains("googleapis.com"));
    }

    // ============================================================================
    // GeminiClient creation tests
    // ============================================================================

    #[test]
    fn test_client_new() {
        let client = GeminiClient::new("test-key".to_string());
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(client.base_url, GEMINI_API_BASE);
        assert_eq!(client.provider_type(), Provider::Gemini);
    }

    #[test]
    fn test_client_builders() {
        let client = GeminiClient::with_model("k".to_string(), "gemini-2.5-pro".to_string())
            .with_base_url("http://127.0.0.1:9999/v1beta/models/")
            .with_temperature(0.0);
        assert_eq!(client.model_name(), "gemini-2.5-pro");
        assert_eq!(client.base_url, "http://127.0.0.1:9999/v1beta/models");
        assert_eq!(client.temperature, 0.0);
    }

    // ============================================================================
    // Request shape tests
    // ============================================================================

    #[test]
    fn test_request_shape() {
        let client = GeminiClient::new("k".to_string());
        let value = serde_json::to_value(client.build_request(&prompt())).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "rules");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "message");
        assert!(value["contents"][0]["parts"][0].get("thought").is_none());
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert!((value["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = GeminiClient::new("k".to_string()).with_base_url("http://127.0.0.1:1");
        let err = client.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn test_transport_error_never_carries_api_key() {
        let client = GeminiClient::new("SECRET-KEY-123".to_string()).with_base_url("http://127.0.0.1:1");
        let err = client.complete(&prompt()).await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"), "key leaked: {}", err);
    }
}
