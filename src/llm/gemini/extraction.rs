// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::gemini::types::{GeminiContent, GeminiResponse};

/// Extract text content from Gemini content (non-thought parts only)
pub fn extract_content(content: &GeminiContent) -> Option<String> {
    let text_parts: Vec<&str> = content
        .parts
        .iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(""))
    }
}

/// Extract the answer text from the first candidate, if any non-blank text exists
pub fn extract_text(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(extract_content)
        .filter(|text| !text.trim().is_empty())
}

/// Describe why no text came back (block reason or finish reason)
pub fn describe_empty(response: &GeminiResponse) -> String {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return format!("prompt blocked: {}", reason);
    }
    match response.candidates.as_ref().and_then(|c| c.first()) {
        None => "no candidates returned".to_string(),
        Some(candidate) => match candidate.finish_reason.as_deref() {
            Some(reason) => format!("no text in candidate (finish reason {})", reason),
            None => "no text in candidate".to_string(),
        },
    }
}
