// src/llm/openai_compat/mod.rs
// Shared OpenAI-compatible chat completions support (OpenAI, DeepSeek, Ollama)

mod client;
pub mod request;
pub mod response;

pub use client::OpenAiCompatClient;
pub use request::{ChatMessage, ChatRequest};
pub use response::{ChatResponse, Usage, parse_chat_response};
