// src/llm/mod.rs
// LLM backends behind the LlmClient trait

pub mod factory;
pub mod gemini;
pub mod http_client;
pub mod logging;
pub mod openai_compat;
pub mod provider;

pub use factory::{ProviderFactory, UnconfiguredClient};
pub use gemini::GeminiClient;
pub use http_client::LlmHttpClient;
pub use openai_compat::OpenAiCompatClient;
pub use provider::{LlmClient, Provider};
