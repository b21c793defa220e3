// Unit tests for the Eco Pilot keyword pipeline

use eco_pilot::core::{
    allocate_reward, calculate_dynamic_reward, extract_preferences, generate_tasks,
    profile_adjustment, recognize_intent, triage_request, Category, EcoAction, Intent, Sentiment,
};
use eco_pilot::models::{CustomerProfile, Hotel, Priority, RewardValues, StaffRole};
use serde_json::Map;

fn hotel() -> Hotel {
    Hotel {
        id: "hotel_3".to_string(),
        name: "Harbour View".to_string(),
        amenities: vec!["Pool".to_string(), "Spa".to_string()],
        attributes: Map::new(),
    }
}

fn guest() -> CustomerProfile {
    let mut profile = CustomerProfile::new("customer_42");
    profile.name = Some("Ana".to_string());
    profile.room_number = Some("204".to_string());
    profile
}

#[test]
fn test_wifi_request_routes_to_it_support() {
    let query = "Could you please help with a wifi issue?";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::ServiceRequest);
    assert_eq!(intent, Intent::TechSupport);
    assert_eq!(entities, vec!["Wi-Fi".to_string()]);

    let tasks = generate_tasks(category, intent, &entities, &guest(), &hotel(), sentiment, 3);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].role, StaffRole::ItSupport);
    assert_eq!(tasks[0].priority, Priority::Critical);
    assert_eq!(tasks[0].description, "Troubleshoot Wi-Fi for Ana in room 204.");
}

#[test]
fn test_housekeeping_praise_is_a_service_request() {
    let query = "The housekeeping service was excellent, thank you!";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::ServiceRequest);
    assert_eq!(sentiment, Sentiment::Positive);
    assert_eq!(intent, Intent::HousekeepingRequest);
    assert_eq!(entities, vec!["cleaning".to_string(), "housekeeping".to_string()]);
}

#[test]
fn test_asthma_alert_goes_to_front_desk() {
    let query = "I am an asthmatic. I need a room away from allergens.";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::MedicalAlert);
    assert_eq!(intent, Intent::AsthmaCare);
    assert_eq!(entities, vec!["room".to_string()]);

    let tasks = generate_tasks(category, intent, &entities, &guest(), &hotel(), sentiment, 3);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].role, StaffRole::FrontDesk);
    assert_eq!(tasks[0].priority, Priority::Critical);
    assert!(tasks[0].description.contains("Ana in room 204 has asthma"));
}

#[test]
fn test_diabetic_care_notifies_kitchen_and_chef() {
    let query = "Please arrange therapeutic nutrition, I am diabetic";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::MedicalAlert);
    assert_eq!(intent, Intent::DiabeticCare);

    let tasks = generate_tasks(category, intent, &entities, &guest(), &hotel(), sentiment, 3);
    let roles: Vec<StaffRole> = tasks.iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![StaffRole::KitchenStaff, StaffRole::Chef]);
    assert!(tasks.iter().all(|t| t.priority == Priority::Critical));
}

#[test]
fn test_negative_review_without_entities() {
    let query = "The service was slow and the amenities were poor. Very disappointed.";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::Review);
    assert_eq!(sentiment, Sentiment::Negative);
    assert_eq!(intent, Intent::GeneralInquiry);
    assert!(entities.is_empty());

    let anonymous = CustomerProfile::new("anon");
    let tasks = generate_tasks(category, intent, &entities, &anonymous, &hotel(), sentiment, 3);
    assert_eq!(tasks.len(), 2);
    assert_eq!(
        tasks[0].description,
        "Investigate and resolve negative review from Guest in room unknown: no specific details."
    );
    assert_eq!(tasks[1].role, StaffRole::FrontDesk);
    assert_eq!(tasks[1].priority, Priority::High);
}

#[test]
fn test_broken_shower_has_no_task() {
    let query = "The shower is broken";
    let (category, sentiment) = triage_request(query);
    let (intent, entities) = recognize_intent(query, category);

    assert_eq!(category, Category::ServiceRequest);
    assert_eq!(intent, Intent::MaintenanceIssue);
    assert_eq!(entities[0], "maintenance");

    let tasks = generate_tasks(category, intent, &entities, &guest(), &hotel(), sentiment, 3);
    assert!(tasks.is_empty());
}

#[test]
fn test_proactive_alert_is_first() {
    let mut profile = guest();
    profile.negative_reviews_count = 4;

    let tasks = generate_tasks(
        Category::ServiceRequest,
        Intent::RealtimeService,
        &[],
        &profile,
        &hotel(),
        Sentiment::Neutral,
        3,
    );

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].role, StaffRole::Manager);
    assert!(tasks[0].description.starts_with("Proactive Alert: Ana"));
    assert_eq!(tasks[1].role, StaffRole::FrontDesk);
}

#[test]
fn test_alert_threshold_is_exclusive() {
    let mut profile = guest();
    profile.negative_reviews_count = 3;

    let tasks = generate_tasks(
        Category::Unknown,
        Intent::GeneralInquiry,
        &[],
        &profile,
        &hotel(),
        Sentiment::Neutral,
        3,
    );
    assert!(tasks.is_empty());
}

#[test]
fn test_linen_opt_out_reward_scales_with_days() {
    let values = RewardValues::default();
    let query = "I would like to opt out of daily linen changes for 3 days.";

    let (category, _) = triage_request(query);
    assert_eq!(category, Category::EcoRequest);

    let reward = allocate_reward(query, 3, &values).unwrap();
    assert_eq!(reward.tokens, 300);
    assert_eq!(reward.kind, "Green & Sustainable Reward");
    assert_eq!(reward.details, "300 tokens for a sustainable action.");
}

#[test]
fn test_dynamic_reward_truncates() {
    let mut values = RewardValues::default();
    values.daily_bonus = 0.1;

    // 100 * 1.1 = 110.00000000000001
    assert_eq!(calculate_dynamic_reward(EcoAction::Light, 2, &values), 110);
    // 250 * 1.3 = 325
    assert_eq!(calculate_dynamic_reward(EcoAction::Transport, 4, &values), 325);
    assert_eq!(calculate_dynamic_reward(EcoAction::Major, 0, &values), 500);
}

#[test]
fn test_no_reward_for_plain_request() {
    assert!(allocate_reward("Can I get some fresh towels?", 1, &RewardValues::default()).is_none());
}

#[test]
fn test_polite_negative_feedback_sums_tokens() {
    let values = RewardValues::default();
    let query = "Please fix this, the room is dirty";
    let (_, sentiment) = triage_request(query);
    assert_eq!(sentiment, Sentiment::Negative);

    let adjustment = profile_adjustment(query, sentiment, Intent::GeneralInquiry, &values);
    assert_eq!(adjustment.token_delta, 2 - 5);
    assert_eq!(adjustment.negative_reviews, 1);
    assert_eq!(adjustment.positive_reviews, 0);
}

#[test]
fn test_preferences_from_message() {
    let signals = extract_preferences("Heading to New York, does the hotel have a Pool and Wi-Fi?");
    assert_eq!(signals.preferred_locations, vec!["new york".to_string()]);
    assert_eq!(signals.amenities_of_interest, vec!["wi-fi".to_string(), "pool".to_string()]);
}
