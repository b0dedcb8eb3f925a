// src/lib.rs
// Customer support message triage: one LLM call, strict output contract, safe fallback

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod labels;
pub mod llm;
pub mod prompt;
pub mod types;
pub mod validation;

pub use analyzer::Analyzer;
pub use error::{AnalysisError, FailureKind, TransportError, TriageError, ValidationError};
pub use labels::{Category, Sentiment};
pub use types::{Analysis, AnalysisRequest, AnalysisResult, Outcome, ValidationOutcome};
pub use validation::ValidationRules;
