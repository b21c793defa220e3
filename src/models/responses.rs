use serde::{Deserialize, Serialize};
use crate::core::PreferenceSignals;
use crate::models::domain::Hotel;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub hotels_cached: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Cached hotel listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelsResponse {
    pub hotels: Vec<Hotel>,
    pub total: usize,
}

/// Preferences learned from a guest message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(flatten)]
    pub signals: PreferenceSignals,
}
