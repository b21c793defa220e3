use serde::{Deserialize, Serialize};
use std::fmt;

use super::keywords::{contains_any, CATEGORY_TABLE, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};

/// First-pass request category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ServiceRequest,
    EcoRequest,
    Review,
    MedicalAlert,
    Unknown,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::ServiceRequest => "service_request",
            Category::EcoRequest => "eco_request",
            Category::Review => "review",
            Category::MedicalAlert => "medical_alert",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        })
    }
}

/// Categorize a request and score its sentiment
///
/// Negative keywords take precedence over positive ones. Categories are
/// tried in table order and the first one with a matching keyword wins.
pub fn triage_request(query: &str) -> (Category, Sentiment) {
    let query = query.to_lowercase();

    let sentiment = if contains_any(&query, NEGATIVE_KEYWORDS) {
        Sentiment::Negative
    } else if contains_any(&query, POSITIVE_KEYWORDS) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    };

    let category = CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| contains_any(&query, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown);

    (category, sentiment)
}
