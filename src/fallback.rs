// src/fallback.rs
// Safe default result for every failed analysis cycle

use crate::error::AnalysisError;
use crate::labels::{Category, Sentiment};
use crate::types::AnalysisResult;
use tracing::warn;

pub const FALLBACK_CATEGORY: Category = Category::GeneralQuery;
pub const FALLBACK_SENTIMENT: Sentiment = Sentiment::Neutral;
pub const FALLBACK_REPLY: &str =
    "We were unable to automatically process this message; a representative will follow up.";

/// The fixed fallback result. Satisfies every `AnalysisResult` invariant.
pub fn fallback_result() -> AnalysisResult {
    AnalysisResult::new(FALLBACK_CATEGORY, FALLBACK_SENTIMENT, FALLBACK_REPLY)
}

/// Turn any failure into the fallback result. Never fails.
pub fn resolve(err: &AnalysisError) -> AnalysisResult {
    warn!(reason = %err.kind(), detail = %err, "Analysis fell back to default result");
    fallback_result()
}
