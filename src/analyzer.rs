// src/analyzer.rs
// The analysis pipeline: prompt -> one backend call -> validation -> fallback

use crate::error::{AnalysisError, TransportError};
use crate::fallback::resolve;
use crate::llm::LlmClient;
use crate::prompt::PromptBuilder;
use crate::types::{Analysis, AnalysisRequest, AnalysisResult, Outcome};
use crate::validation::{ValidationRules, validate};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

/// Classifies customer messages through a single backend call.
///
/// Holds no per-message state; clone it freely and run analyses concurrently.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn LlmClient>,
    rules: ValidationRules,
    prompts: PromptBuilder,
}

impl Analyzer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_rules(client, ValidationRules::default())
    }

    pub fn with_rules(client: Arc<dyn LlmClient>, rules: ValidationRules) -> Self {
        Self {
            client,
            rules,
            prompts: PromptBuilder::new(rules),
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Analyze one message. Always returns a well-formed result; failures
    /// yield the fallback result.
    pub async fn analyze(&self, message: &str, timeout: Duration) -> AnalysisResult {
        self.analyze_with_diagnostics(message, timeout).await.result
    }

    /// Analyze one message and report whether, and why, the fallback was used
    #[instrument(skip(self, message), fields(request_id, provider = %self.client.provider_type()))]
    pub async fn analyze_with_diagnostics(&self, message: &str, timeout: Duration) -> Analysis {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", &request_id);
        let start_time = Instant::now();

        let (result, outcome) = match self.run(message, timeout).await {
            Ok(result) => (result, Outcome::Validated),
            Err(err) => (resolve(&err), Outcome::from_error(&err)),
        };

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            category = %result.category,
            sentiment = %result.sentiment,
            fallback = outcome.is_fallback(),
            "Analysis complete"
        );

        Analysis {
            request_id,
            result,
            outcome,
        }
    }

    async fn run(&self, message: &str, timeout: Duration) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalysisRequest::new(message)?;
        let prompt = self.prompts.build(&request);
        debug!(message = %request.message(), "Prompt built");

        // Validation only ever sees a fully awaited response
        let raw = match tokio::time::timeout(timeout, self.client.complete(&prompt)).await {
            Ok(response) => response?,
            Err(_) => {
                return Err(TransportError::Network(format!(
                    "backend call timed out after {}ms",
                    timeout.as_millis()
                ))
                .into());
            }
        };
        debug!(raw_len = raw.len(), "Backend response received");

        validate(&raw, &self.rules)
            .into_result()
            .map_err(AnalysisError::from)
    }
}
