use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Guest profile as stored in the `customers` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_number: Option<String>,
    #[serde(default)]
    pub tokens: i64,
    #[serde(default)]
    pub positive_reviews_count: i64,
    #[serde(default)]
    pub negative_reviews_count: i64,
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default)]
    pub staff_feedback: Map<String, Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub rewards: Vec<RewardEvent>,
    #[serde(default)]
    pub is_diabetic: bool,
    #[serde(default)]
    pub is_asthmatic: bool,
}

impl CustomerProfile {
    /// Profile written on a guest's first contact
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            room_number: None,
            tokens: 0,
            positive_reviews_count: 0,
            negative_reviews_count: 0,
            preferences: Map::new(),
            staff_feedback: Map::new(),
            history: Vec::new(),
            rewards: Vec::new(),
            is_diabetic: false,
            is_asthmatic: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Guest")
    }

    pub fn display_room(&self) -> &str {
        self.room_number.as_deref().unwrap_or("unknown")
    }
}

/// Room numbers are entered by hand in the console and arrive as either form.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Static hotel reference data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Staff roles a task can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Housekeeping,
    #[serde(rename = "Front Desk")]
    FrontDesk,
    Maintenance,
    Concierge,
    #[serde(rename = "IT Support")]
    ItSupport,
    Manager,
    Accountant,
    #[serde(rename = "Procurement Office")]
    ProcurementOffice,
    #[serde(rename = "Kitchen Staff")]
    KitchenStaff,
    #[serde(rename = "Guide/Concierge")]
    GuideConcierge,
    #[serde(rename = "Owner/Manager")]
    OwnerManager,
    #[serde(rename = "Personal Butler")]
    PersonalButler,
    #[serde(rename = "Wellness Coordinator")]
    WellnessCoordinator,
    Chef,
}

impl StaffRole {
    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Housekeeping => "Housekeeping",
            StaffRole::FrontDesk => "Front Desk",
            StaffRole::Maintenance => "Maintenance",
            StaffRole::Concierge => "Concierge",
            StaffRole::ItSupport => "IT Support",
            StaffRole::Manager => "Manager",
            StaffRole::Accountant => "Accountant",
            StaffRole::ProcurementOffice => "Procurement Office",
            StaffRole::KitchenStaff => "Kitchen Staff",
            StaffRole::GuideConcierge => "Guide/Concierge",
            StaffRole::OwnerManager => "Owner/Manager",
            StaffRole::PersonalButler => "Personal Butler",
            StaffRole::WellnessCoordinator => "Wellness Coordinator",
            StaffRole::Chef => "Chef",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    High,
    Critical,
}

/// Task produced by the pipeline before it is bound to a hotel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub role: StaffRole,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(role: StaffRole, priority: Priority, description: impl Into<String>) -> Self {
        Self {
            role,
            description: description.into(),
            priority,
        }
    }
}

/// Task published to the staff-facing `tasks` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub role: StaffRole,
    pub description: String,
    pub priority: Priority,
    pub hotel_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Task {
    pub fn from_draft(draft: TaskDraft, hotel_id: &str) -> Self {
        Self {
            role: draft.role,
            description: draft.description,
            priority: draft.priority,
            hotel_id: hotel_id.to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Entry in a profile's reward history
///
/// Every event carries its own id so that two identical rewards stay two
/// entries once merged into the stored history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    #[serde(default)]
    pub tokens: i64,
}

/// Eco scenario parsed from the seed Markdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub id: u32,
    pub hotel_name: String,
    pub hotel_budget: String,
    pub client_name: String,
    pub client_budget: String,
    pub description: String,
    pub tokens: i64,
}

/// Token values for recognized behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardValues {
    pub eco_action_light: i64,
    pub eco_action_water: i64,
    pub eco_action_transport: i64,
    pub eco_action_food: i64,
    pub eco_action_zero_waste: i64,
    pub eco_action_major: i64,
    pub positive_review: i64,
    pub politeness: i64,
    pub negative_feedback_penalty: i64,
    /// Fractional bonus per extra day an eco action is kept up
    pub daily_bonus: f64,
    /// Negative review count above which a proactive manager alert is raised
    pub proactive_alert_threshold: i64,
}

impl Default for RewardValues {
    fn default() -> Self {
        Self {
            eco_action_light: 100,
            eco_action_water: 200,
            eco_action_transport: 250,
            eco_action_food: 180,
            eco_action_zero_waste: 150,
            eco_action_major: 500,
            positive_review: 10,
            politeness: 2,
            negative_feedback_penalty: 5,
            daily_bonus: 0.25,
            proactive_alert_threshold: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_defaults_fill_missing_fields() {
        let profile: CustomerProfile = serde_json::from_value(json!({
            "id": "customer_1",
            "room_number": 214,
        }))
        .unwrap();

        assert_eq!(profile.tokens, 0);
        assert_eq!(profile.room_number.as_deref(), Some("214"));
        assert_eq!(profile.display_name(), "Guest");
        assert!(!profile.is_diabetic);
    }

    #[test]
    fn test_staff_role_labels() {
        assert_eq!(serde_json::to_value(StaffRole::ItSupport).unwrap(), json!("IT Support"));
        assert_eq!(StaffRole::GuideConcierge.to_string(), "Guide/Concierge");
        let role: StaffRole = serde_json::from_value(json!("Kitchen Staff")).unwrap();
        assert_eq!(role, StaffRole::KitchenStaff);
    }

    #[test]
    fn test_hotel_keeps_extra_attributes() {
        let hotel: Hotel = serde_json::from_value(json!({
            "id": "hotel_5",
            "name": "Savanna Lodge",
            "amenities": ["Pool"],
            "budget": "High",
        }))
        .unwrap();

        assert_eq!(hotel.attributes.get("budget"), Some(&json!("High")));
    }
}
