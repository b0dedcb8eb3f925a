// src/error.rs
// Error types for the triage pipeline and the crate surface around it

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure surfaced by a model backend. One call, one of these or raw text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimit(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),
}

/// First failed check when validating model output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed output: {0}")]
    MalformedOutput(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unexpected field: {0}")]
    UnexpectedField(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid sentiment: {0}")]
    InvalidSentiment(String),

    #[error("reply is empty or not a string")]
    EmptyReply,

    #[error("reply too long: {len} chars (max {max})")]
    ReplyTooLong { len: usize, max: usize },
}

/// Any reason an analysis cycle ends in the fallback result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("message is empty")]
    EmptyInput,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Flat, serializable tag for every failure in the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyInput,
    Network,
    Auth,
    RateLimit,
    EmptyResponse,
    MalformedOutput,
    MissingField,
    UnexpectedField,
    InvalidCategory,
    InvalidSentiment,
    EmptyReply,
    ReplyTooLong,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EmptyInputError",
            Self::Network => "NetworkError",
            Self::Auth => "AuthError",
            Self::RateLimit => "RateLimitError",
            Self::EmptyResponse => "EmptyResponseError",
            Self::MalformedOutput => "MalformedOutputError",
            Self::MissingField => "MissingFieldError",
            Self::UnexpectedField => "UnexpectedFieldError",
            Self::InvalidCategory => "InvalidCategoryError",
            Self::InvalidSentiment => "InvalidSentimentError",
            Self::EmptyReply => "EmptyReplyError",
            Self::ReplyTooLong => "ReplyTooLongError",
        }
    }

    /// True for failures raised by the model backend
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network | Self::Auth | Self::RateLimit | Self::EmptyResponse
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Auth(_) => FailureKind::Auth,
            Self::RateLimit(_) => FailureKind::RateLimit,
            Self::EmptyResponse(_) => FailureKind::EmptyResponse,
        }
    }
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedOutput(_) => FailureKind::MalformedOutput,
            Self::MissingField(_) => FailureKind::MissingField,
            Self::UnexpectedField(_) => FailureKind::UnexpectedField,
            Self::InvalidCategory(_) => FailureKind::InvalidCategory,
            Self::InvalidSentiment(_) => FailureKind::InvalidSentiment,
            Self::EmptyReply => FailureKind::EmptyReply,
            Self::ReplyTooLong { .. } => FailureKind::ReplyTooLong,
        }
    }
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyInput => FailureKind::EmptyInput,
            Self::Transport(e) => e.kind(),
            Self::Validation(e) => e.kind(),
        }
    }
}

/// Crate-level error for everything outside the never-failing analysis boundary
/// (config file loading, JSON rendering of results)
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriageError {
    /// True for a config file that simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Convenience type alias for Result using TriageError
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Display tests
    // ============================================================================

    #[test]
    fn test_transport_error_messages() {
        let err = TransportError::RateLimit("quota exceeded".to_string());
        assert!(err.to_string().contains("rate limited"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MissingField("reply");
        assert_eq!(err.to_string(), "missing field: reply");

        let err = ValidationError::ReplyTooLong { len: 412, max: 300 };
        assert!(err.to_string().contains("412"));
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn test_analysis_error_is_transparent() {
        let err: AnalysisError = ValidationError::InvalidCategory("Urgent".to_string()).into();
        assert_eq!(err.to_string(), "invalid category: Urgent");
    }

    // ============================================================================
    // FailureKind mapping tests
    // ============================================================================

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AnalysisError::EmptyInput.kind(), FailureKind::EmptyInput);
        assert_eq!(
            AnalysisError::from(TransportError::Auth("bad key".into())).kind(),
            FailureKind::Auth
        );
        assert_eq!(
            AnalysisError::from(ValidationError::EmptyReply).kind(),
            FailureKind::EmptyReply
        );
    }

    #[test]
    fn test_kind_names_use_taxonomy() {
        assert_eq!(FailureKind::MalformedOutput.to_string(), "MalformedOutputError");
        assert_eq!(FailureKind::RateLimit.to_string(), "RateLimitError");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::InvalidSentiment).unwrap();
        assert_eq!(json, "\"invalid_sentiment\"");
    }

    #[test]
    fn test_is_transport() {
        assert!(FailureKind::Network.is_transport());
        assert!(FailureKind::EmptyResponse.is_transport());
        assert!(!FailureKind::EmptyInput.is_transport());
        assert!(!FailureKind::MalformedOutput.is_transport());
    }

    // ============================================================================
    // TriageError tests
    // ============================================================================

    #[test]
    fn test_config_error() {
        let err = TriageError::Config("missing key".to_string());
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: TriageError = json_err.into();
        assert!(matches!(err, TriageError::Json(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TriageError = io_err.into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("I/O error"));

        let denied: TriageError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no").into();
        assert!(!denied.is_not_found());
        assert!(!TriageError::Config("x".to_string()).is_not_found());
    }
}
