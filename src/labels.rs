// src/labels.rs
// Fixed label sets for classification output (categories and sentiments)

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Intent/topic of a customer message
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Category {
    #[serde(rename = "Complaint")]
    #[strum(serialize = "Complaint")]
    Complaint,
    #[serde(rename = "Refund/Return")]
    #[strum(serialize = "Refund/Return")]
    RefundReturn,
    #[serde(rename = "Sales Inquiry")]
    #[strum(serialize = "Sales Inquiry")]
    SalesInquiry,
    #[serde(rename = "Delivery Question")]
    #[strum(serialize = "Delivery Question")]
    DeliveryQuestion,
    #[serde(rename = "Account/Technical Issue")]
    #[strum(serialize = "Account/Technical Issue")]
    AccountTechnicalIssue,
    #[serde(rename = "General Query")]
    #[strum(serialize = "General Query")]
    GeneralQuery,
    #[serde(rename = "Spam")]
    #[strum(serialize = "Spam")]
    Spam,
}

/// Emotional tone of a customer message
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Canonical category order, as rendered into prompts
pub const CATEGORIES: [Category; 7] = [
    Category::Complaint,
    Category::RefundReturn,
    Category::SalesInquiry,
    Category::DeliveryQuestion,
    Category::AccountTechnicalIssue,
    Category::GeneralQuery,
    Category::Spam,
];

/// Canonical sentiment order
pub const SENTIMENTS: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

impl Category {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Case-sensitive exact match against the canonical names. No trimming.
    pub fn parse_exact(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Case-sensitive exact match against the canonical names. No trimming.
    pub fn parse_exact(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

pub fn is_valid_category(s: &str) -> bool {
    Category::parse_exact(s).is_some()
}

pub fn is_valid_sentiment(s: &str) -> bool {
    Sentiment::parse_exact(s).is_some()
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.as_str()).collect()
}

pub fn sentiment_names() -> Vec<&'static str> {
    SENTIMENTS.iter().map(|s| s.as_str()).collect()
}
