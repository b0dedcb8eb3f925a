// src/llm/http_client.rs
// Shared HTTP layer for LLM backends: one attempt, failures mapped to TransportError

use crate::error::TransportError;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Max characters of an error body carried into a TransportError
const ERROR_BODY_EXCERPT_CHARS: usize = 200;

/// Shared HTTP client configuration for all LLM backends
pub struct LlmHttpClient {
    client: Client,
}

impl LlmHttpClient {
    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// POST a JSON body with optional Bearer auth, mapping non-2xx statuses
    /// with the default rules. Returns the response body on success.
    pub async fn execute_json(
        &self,
        request_id: &str,
        url: &str,
        bearer: Option<&str>,
        body: String,
    ) -> Result<String, TransportError> {
        let (status, text) = self
            .send_once(request_id, body, |client, body| {
                let req = client
                    .post(url)
                    .header("Content-Type", "application/json")
                    .body(body);
                match bearer {
                    Some(key) => req.header("Authorization", format!("Bearer {}", key)),
                    None => req,
                }
            })
            .await?;
        check_status(status, text)
    }

    /// Send a single request built by `build_request` and return status + body.
    ///
    /// Only connection-level failures are mapped here; callers decide how to
    /// interpret the status (see [`check_status`]).
    pub async fn send_once<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<(StatusCode, String), TransportError>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        debug!(
            request_id = %request_id,
            status = %status,
            body_len = text.len(),
            "LLM HTTP response received"
        );
        Ok((status, text))
    }
}

/// Default status mapping shared by all backends
pub fn check_status(status: StatusCode, body: String) -> Result<String, TransportError> {
    if status.is_success() {
        return Ok(body);
    }
    let detail = format!("HTTP {}: {}", status, excerpt(&body));
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimit(detail),
        _ => TransportError::Network(detail),
    })
}

/// The request URL is dropped from the message; some backends carry credentials in it.
fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    let e = e.without_url();
    if e.is_timeout() {
        TransportError::Network(format!("request timed out: {}", e))
    } else if e.is_connect() {
        TransportError::Network(format!("connection failed: {}", e))
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Truncate an error body for inclusion in error messages
pub(crate) fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_BODY_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}
