use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::keywords::{contains_any, POLITENESS_PHRASES};
use super::triage::Sentiment;
use crate::models::RewardValues;

/// Incremental profile changes derived from one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAdjustment {
    pub token_delta: i64,
    pub positive_reviews: i64,
    pub negative_reviews: i64,
    pub mark_diabetic: bool,
    pub mark_asthmatic: bool,
}

impl ProfileAdjustment {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Politeness, sentiment and medical signals for the guest profile
///
/// Token deltas from politeness and sentiment are summed.
pub fn profile_adjustment(
    query: &str,
    sentiment: Sentiment,
    intent: Intent,
    values: &RewardValues,
) -> ProfileAdjustment {
    let query = query.to_lowercase();
    let mut adjustment = ProfileAdjustment::default();

    if contains_any(&query, POLITENESS_PHRASES) {
        adjustment.token_delta += values.politeness;
    }

    match sentiment {
        Sentiment::Positive => {
            adjustment.positive_reviews += 1;
            adjustment.token_delta += values.positive_review;
        }
        Sentiment::Negative => {
            adjustment.negative_reviews += 1;
            adjustment.token_delta -= values.negative_feedback_penalty;
        }
        Sentiment::Neutral => {}
    }

    adjustment.mark_diabetic = intent == Intent::DiabeticCare;
    adjustment.mark_asthmatic = intent == Intent::AsthmaCare;

    adjustment
}
