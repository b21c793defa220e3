use serde::{Deserialize, Serialize};
use validator::Validate;

/// Guest request submitted for triage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "customer_id", rename = "customerId")]
    pub customer_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "hotel_id", rename = "hotelId")]
    pub hotel_id: String,
    #[serde(default)]
    pub query: String,
    /// Channel the request came through (query, review, buzzer_request)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_duration_days", alias = "duration_days", rename = "durationDays")]
    pub duration_days: u32,
}

fn default_duration_days() -> u32 {
    1
}

impl GuestRequest {
    pub fn new(
        customer_id: impl Into<String>,
        hotel_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            hotel_id: hotel_id.into(),
            query: query.into(),
            kind: None,
            duration_days: default_duration_days(),
        }
    }

    pub fn with_duration(mut self, duration_days: u32) -> Self {
        self.duration_days = duration_days;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Free-text message used to learn guest preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreferenceUpdateRequest {
    #[validate(length(min = 1))]
    pub message: String,
}
