// src/types.rs
// Request/result types flowing through one analysis cycle

use crate::error::{AnalysisError, FailureKind, Result as TriageResult, ValidationError};
use crate::labels::{Category, Sentiment};
use serde::{Deserialize, Serialize};

/// One raw customer message, guaranteed non-blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    message: String,
}

impl AnalysisRequest {
    /// The message is kept verbatim; only the emptiness check trims.
    pub fn new(message: impl Into<String>) -> Result<Self, AnalysisError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        Ok(Self { message })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Structured classification of one message.
///
/// The serialized form (`category`, `sentiment`, `reply`) is the public wire
/// contract shown by the JSON view of the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub category: Category,
    pub sentiment: Sentiment,
    pub reply: String,
}

impl AnalysisResult {
    pub fn new(category: Category, sentiment: Sentiment, reply: impl Into<String>) -> Self {
        Self {
            category,
            sentiment,
            reply: reply.into(),
        }
    }

    pub fn to_json_pretty(&self) -> TriageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of validating raw model output. First failed check wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(AnalysisResult),
    Invalid(ValidationError),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn into_result(self) -> Result<AnalysisResult, ValidationError> {
        match self {
            Self::Valid(result) => Ok(result),
            Self::Invalid(reason) => Err(reason),
        }
    }
}

/// How the result of a cycle was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Validated,
    Fallback { reason: FailureKind, detail: String },
}

impl Outcome {
    pub fn from_error(err: &AnalysisError) -> Self {
        Self::Fallback {
            reason: err.kind(),
            detail: err.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Validated => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Result plus the diagnostic channel for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub request_id: String,
    pub result: AnalysisResult,
    pub outcome: Outcome,
}

impl Analysis {
    /// Pretty JSON including the request id and fallback reason
    pub fn to_json_pretty(&self) -> TriageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
