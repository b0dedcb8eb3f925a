// src/llm/logging.rs
// Shared LLM logging helpers to reduce duplication across backends

use crate::error::TransportError;
use tracing::{debug, info, warn};

/// Log the start of a backend call. Prompt text only goes to debug.
pub fn log_request(request_id: &str, provider: &str, model: &str, prompt_len: usize) {
    info!(
        request_id = %request_id,
        model = %model,
        prompt_len = prompt_len,
        "Starting {} classification request", provider
    );
}

/// Log the raw body sent to a backend
pub fn log_request_body(request_id: &str, provider: &str, body: &str) {
    debug!(request_id = %request_id, "{} request: {}", provider, body);
}

/// Log completion summary for an LLM call.
pub fn log_completion(request_id: &str, provider: &str, duration_ms: u64, content_len: usize) {
    info!(
        request_id = %request_id,
        duration_ms = duration_ms,
        content_len = content_len,
        "{} call complete", provider
    );
}

/// Log a failed LLM call.
pub fn log_transport_failure(
    request_id: &str,
    provider: &str,
    duration_ms: u64,
    error: &TransportError,
) {
    warn!(
        request_id = %request_id,
        duration_ms = duration_ms,
        kind = %error.kind(),
        error = %error,
        "{} call failed", provider
    );
}
