use crate::core::{intent::Intent, triage::{Category, Sentiment}};
use crate::models::{CustomerProfile, Hotel, Priority, StaffRole, TaskDraft};

/// Build the staff tasks for a recognized request
///
/// A proactive manager alert is prepended for guests whose negative review
/// count exceeds `alert_threshold`. Requests that match no rule yield no
/// further tasks.
pub fn generate_tasks(
    category: Category,
    intent: Intent,
    entities: &[String],
    profile: &CustomerProfile,
    _hotel: &Hotel,
    sentiment: Sentiment,
    alert_threshold: i64,
) -> Vec<TaskDraft> {
    let name = profile.display_name();
    let room = profile.display_room();
    let mut tasks = Vec::new();

    if profile.negative_reviews_count > alert_threshold {
        tasks.push(TaskDraft::new(
            StaffRole::Manager,
            Priority::Critical,
            format!(
                "Proactive Alert: {name} has a history of negative reviews. \
                 Ensure high-quality service."
            ),
        ));
    }

    match category {
        Category::MedicalAlert => match intent {
            Intent::DiabeticCare => {
                tasks.push(TaskDraft::new(
                    StaffRole::KitchenStaff,
                    Priority::Critical,
                    format!(
                        "URGENT: {name} in room {room} requires therapeutic nutrition \
                         for diabetic condition. Coordinate with chef on duty on \
                         suggested meal changes."
                    ),
                ));
                tasks.push(TaskDraft::new(
                    StaffRole::Chef,
                    Priority::Critical,
                    format!(
                        "URGENT: {name} in room {room} requires diabetic-friendly meal. \
                         Suggested changes: avoid added sugars, reduce carbs, and focus \
                         on fresh vegetables and lean proteins."
                    ),
                ));
            }
            Intent::AsthmaCare => tasks.push(TaskDraft::new(
                StaffRole::FrontDesk,
                Priority::Critical,
                format!(
                    "URGENT: {name} in room {room} has asthma. Re-allocate room to a \
                     lower floor away from potential triggers. Ensure air purifier \
                     is installed."
                ),
            )),
            _ => {}
        },
        Category::Review => {
            if sentiment == Sentiment::Positive {
                tasks.push(TaskDraft::new(
                    StaffRole::Manager,
                    Priority::Low,
                    format!(
                        "Acknowledge and praise staff member mentioned in positive review \
                         from {name}."
                    ),
                ));
            } else {
                tasks.push(TaskDraft::new(
                    StaffRole::Manager,
                    Priority::Critical,
                    format!(
                        "Investigate and resolve negative review from {name} in room {room}: {}.",
                        describe_entities(entities)
                    ),
                ));
                tasks.push(TaskDraft::new(
                    StaffRole::FrontDesk,
                    Priority::High,
                    format!("Offer a remedy to {name} for their negative review."),
                ));
            }
        }
        Category::ServiceRequest => {
            let task = match intent {
                Intent::TechSupport => Some(TaskDraft::new(
                    StaffRole::ItSupport,
                    Priority::Critical,
                    format!("Troubleshoot Wi-Fi for {name} in room {room}."),
                )),
                Intent::HousekeepingRequest => Some(TaskDraft::new(
                    StaffRole::Housekeeping,
                    Priority::High,
                    format!("Attend to a cleaning or laundry request for {name} in room {room}."),
                )),
                Intent::RealtimeService => Some(TaskDraft::new(
                    StaffRole::FrontDesk,
                    Priority::Critical,
                    format!(
                        "URGENT: Buzzer request from {name} in room {room}. \
                         Respond immediately."
                    ),
                )),
                Intent::FoodOrder => Some(TaskDraft::new(
                    StaffRole::KitchenStaff,
                    Priority::High,
                    format!(
                        "New meal order for {name} in room {room}. Check for eco-friendly \
                         suggestions: use locally sourced ingredients and minimal packaging."
                    ),
                )),
                _ => None,
            };
            tasks.extend(task);
        }
        Category::EcoRequest => tasks.push(TaskDraft::new(
            StaffRole::Housekeeping,
            Priority::Low,
            format!("Guest {name} opted for eco-friendly housekeeping. Update schedule."),
        )),
        Category::Unknown => {}
    }

    tasks
}

fn describe_entities(entities: &[String]) -> String {
    if entities.is_empty() {
        "no specific details".to_string()
    } else {
        entities.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn create_hotel() -> Hotel {
        Hotel {
            id: "hotel_5".to_string(),
            name: "Savanna Lodge".to_string(),
            amenities: vec!["Pool".to_string()],
            attributes: Map::new(),
        }
    }

    fn create_profile(negative_reviews: i64) -> CustomerProfile {
        let mut profile = CustomerProfile::new("customer_1");
        profile.name = Some("Ada".to_string());
        profile.room_number = Some("204".to_string());
        profile.negative_reviews_count = negative_reviews;
        profile
    }

    #[test]
    fn test_tech_support_task() {
        let tasks = generate_tasks(
            Category::ServiceRequest,
            Intent::TechSupport,
            &[],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].role, StaffRole::ItSupport);
        assert_eq!(tasks[0].priority, Priority::Critical);
        assert_eq!(tasks[0].description, "Troubleshoot Wi-Fi for Ada in room 204.");
    }

    #[test]
    fn test_proactive_alert_above_threshold() {
        let hotel = create_hotel();
        let at_threshold = generate_tasks(
            Category::Unknown,
            Intent::GeneralInquiry,
            &[],
            &create_profile(3),
            &hotel,
            Sentiment::Neutral,
            3,
        );
        assert!(at_threshold.is_empty());

        let above = generate_tasks(
            Category::Unknown,
            Intent::GeneralInquiry,
            &[],
            &create_profile(4),
            &hotel,
            Sentiment::Neutral,
            3,
        );
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].role, StaffRole::Manager);
        assert!(above[0].description.starts_with("Proactive Alert: Ada"));
    }

    #[test]
    fn test_negative_review_tasks() {
        let tasks = generate_tasks(
            Category::Review,
            Intent::GeneralInquiry,
            &["chef".to_string(), "breakfast".to_string()],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Negative,
            3,
        );

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority, Priority::Critical);
        assert!(tasks[0].description.ends_with("room 204: chef, breakfast."));
        assert_eq!(tasks[1].role, StaffRole::FrontDesk);
        assert_eq!(tasks[1].priority, Priority::High);
    }

    #[test]
    fn test_neutral_review_treated_as_negative() {
        let tasks = generate_tasks(
            Category::Review,
            Intent::GeneralInquiry,
            &[],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].description.contains("no specific details"));
    }

    #[test]
    fn test_positive_review_task() {
        let tasks = generate_tasks(
            Category::Review,
            Intent::GeneralInquiry,
            &[],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Positive,
            3,
        );
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::Low);
    }

    #[test]
    fn test_diabetic_care_tasks() {
        let tasks = generate_tasks(
            Category::MedicalAlert,
            Intent::DiabeticCare,
            &[],
            &CustomerProfile::new("customer_2"),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );

        let roles: Vec<StaffRole> = tasks.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![StaffRole::KitchenStaff, StaffRole::Chef]);
        assert!(tasks[0].description.contains("Guest in room unknown"));
    }

    #[test]
    fn test_eco_request_task() {
        let tasks = generate_tasks(
            Category::EcoRequest,
            Intent::EcoTransport,
            &[],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].role, StaffRole::Housekeeping);
        assert_eq!(tasks[0].priority, Priority::Low);
    }

    #[test]
    fn test_general_service_inquiry_has_no_task() {
        let tasks = generate_tasks(
            Category::ServiceRequest,
            Intent::GeneralInquiry,
            &[],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_maintenance_issue_has_no_task() {
        let tasks = generate_tasks(
            Category::ServiceRequest,
            Intent::MaintenanceIssue,
            &["maintenance".to_string()],
            &create_profile(0),
            &create_hotel(),
            Sentiment::Neutral,
            3,
        );
        assert!(tasks.is_empty());
    }
}
