// src/llm/openai_compat/response.rs
// OpenAI-compatible chat response parsing

use crate::error::TransportError;
use serde::Deserialize;

/// Non-streaming chat response (OpenAI-compatible format)
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Parse an OpenAI-compatible chat response and pull out the first choice's text
pub fn parse_chat_response(response_body: &str) -> Result<(String, Option<Usage>), TransportError> {
    let data: ChatResponse = serde_json::from_str(response_body)
        .map_err(|e| TransportError::EmptyResponse(format!("undecodable chat response: {}", e)))?;

    let usage = data.usage;
    let Some(choice) = data.choices.into_iter().next() else {
        return Err(TransportError::EmptyResponse("no choices returned".to_string()));
    };

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok((content, usage)),
        _ => Err(TransportError::EmptyResponse(match choice.finish_reason {
            Some(reason) => format!("no content in choice (finish reason {})", reason),
            None => "no content in choice".to_string(),
        })),
    }
}
