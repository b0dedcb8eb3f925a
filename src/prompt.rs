// src/prompt.rs
// Deterministic prompt construction for message classification

use crate::labels::{category_names, sentiment_names};
use crate::types::AnalysisRequest;
use crate::validation::ValidationRules;

/// Instruction payload for one classification call.
///
/// `system` is identical for every message (task, labels, output rules);
/// `user` carries the customer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single-text form for backends without a system role
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Builds prompts from the label registry and validation bounds
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    rules: ValidationRules,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}

impl PromptBuilder {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// Build the shared system prompt
    pub fn build_system_prompt(&self) -> String {
        format!(
            r#"You are a customer support assistant.

You will receive a single customer message.
Your job:
1) Assign exactly ONE category
2) Assign exactly ONE sentiment
3) Write a short, professional auto-reply

Allowed categories (must match exactly):
{categories}

Allowed sentiments (must match exactly):
{sentiments}

Output rules (very important):
- Output MUST be a single valid JSON object ONLY (no markdown, no code fences, no text before or after it).
- The JSON object must have exactly these keys and no others: "category", "sentiment", "reply"
- "category" must be one of the allowed categories, copied exactly.
- "sentiment" must be one of the allowed sentiments, copied exactly.
- "reply" must be one or two sentences, professional in tone, relevant to the message, and at most {max_reply} characters."#,
            categories = render_list(&category_names()),
            sentiments = render_list(&sentiment_names()),
            max_reply = self.rules.max_reply_chars,
        )
    }

    /// Build the user part. The message is embedded as a JSON string literal.
    pub fn build_user_prompt(&self, request: &AnalysisRequest) -> String {
        let escaped = serde_json::to_string(request.message())
            .unwrap_or_else(|_| format!("{:?}", request.message()));
        format!("Classify this customer message (given as a JSON string):\n{}", escaped)
    }

    pub fn build(&self, request: &AnalysisRequest) -> Prompt {
        Prompt {
            system: self.build_system_prompt(),
            user: self.build_user_prompt(request),
        }
    }
}

fn render_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
