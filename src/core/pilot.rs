use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    intent::{recognize_intent, Intent},
    preferences::{extract_preferences, PreferenceSignals},
    personalize::{profile_adjustment, ProfileAdjustment},
    rewards::allocate_reward,
    tasks::generate_tasks,
    triage::{triage_request, Category, Sentiment},
};
use crate::models::{CustomerProfile, GuestRequest, RewardEvent, RewardValues, Task};
use crate::services::{to_document, DocumentStore, FieldUpdate, HotelDirectory, StoreError};

#[derive(Debug, Error)]
pub enum PilotError {
    #[error("Hotel ID {0} not found")]
    HotelNotFound(String),
}

/// Collection names in the document store
#[derive(Debug, Clone)]
pub struct Collections {
    pub customers: String,
    pub hotels: String,
    pub tasks: String,
    pub scenarios: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            customers: "customers".to_string(),
            hotels: "hotels".to_string(),
            tasks: "tasks".to_string(),
            scenarios: "scenarios".to_string(),
        }
    }
}

/// Everything derived and written for one guest request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "hotelId")]
    pub hotel_id: String,
    pub category: Category,
    pub sentiment: Sentiment,
    pub intent: Intent,
    pub entities: Vec<String>,
    pub tasks: Vec<Task>,
    pub reward: Option<RewardEvent>,
    #[serde(rename = "tokenDelta")]
    pub token_delta: i64,
    /// Ids of the task documents that were written successfully
    #[serde(rename = "taskIds")]
    pub task_ids: Vec<String>,
}

/// Request triage and task dispatch pipeline
///
/// # Pipeline Stages
/// 1. Triage and sentiment
/// 2. Intent and entity recognition
/// 3. Task generation
/// 4. Rewards and profile personalization
/// 5. Task publication
///
/// Store failures after the profile lookup are logged and skipped.
#[derive(Clone)]
pub struct Pilot {
    store: Arc<dyn DocumentStore>,
    hotels: Arc<HotelDirectory>,
    collections: Collections,
    values: RewardValues,
}

impl Pilot {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        hotels: Arc<HotelDirectory>,
        collections: Collections,
        values: RewardValues,
    ) -> Self {
        Self {
            store,
            hotels,
            collections,
            values,
        }
    }

    /// Build a pilot whose hotel directory is read from the store
    pub async fn load(
        store: Arc<dyn DocumentStore>,
        collections: Collections,
        values: RewardValues,
    ) -> Self {
        let hotels = HotelDirectory::load(store.as_ref(), &collections.hotels).await;
        Self::new(store, Arc::new(hotels), collections, values)
    }

    pub fn hotels(&self) -> &HotelDirectory {
        &self.hotels
    }

    pub fn reward_values(&self) -> &RewardValues {
        &self.values
    }

    /// Process a guest's request end to end
    pub async fn process_request(
        &self,
        request: &GuestRequest,
    ) -> Result<DispatchOutcome, PilotError> {
        let customer_id = request.customer_id.as_str();
        tracing::info!("Processing request for customer {}", customer_id);

        let profile = self.get_or_create_profile(customer_id).await;

        let hotel = self.hotels.get(&request.hotel_id).ok_or_else(|| {
            tracing::warn!("Hotel ID {} not found", request.hotel_id);
            PilotError::HotelNotFound(request.hotel_id.clone())
        })?;

        let (category, sentiment) = triage_request(&request.query);
        tracing::info!("Request categorized as: {} with sentiment: {}", category, sentiment);

        let (intent, entities) = recognize_intent(&request.query, category);
        tracing::info!("Recognized intent: {}, Entities: {:?}", intent, entities);

        let drafts = generate_tasks(
            category,
            intent,
            &entities,
            &profile,
            hotel,
            sentiment,
            self.values.proactive_alert_threshold,
        );
        let tasks: Vec<Task> = drafts
            .into_iter()
            .map(|draft| Task::from_draft(draft, &request.hotel_id))
            .collect();

        let reward = allocate_reward(&request.query, request.duration_days, &self.values);
        if let Some(reward) = &reward {
            tracing::info!("Reward assigned for sustainable behavior: {}", reward.details);
        }
        let adjustment = profile_adjustment(&request.query, sentiment, intent, &self.values);
        let token_delta = adjustment.token_delta + reward.as_ref().map_or(0, |r| r.tokens);

        self.apply_profile_updates(customer_id, reward.as_ref(), &adjustment, token_delta)
            .await;

        let task_ids = self.send_tasks_to_staff(&tasks).await;

        tracing::info!(
            "Generated {} tasks for customer {} ({} sent)",
            tasks.len(),
            customer_id,
            task_ids.len()
        );

        Ok(DispatchOutcome {
            customer_id: customer_id.to_string(),
            hotel_id: request.hotel_id.clone(),
            category,
            sentiment,
            intent,
            entities,
            tasks,
            reward,
            token_delta,
            task_ids,
        })
    }

    /// Learn location and amenity preferences from a free-text message
    pub async fn update_preferences(&self, customer_id: &str, message: &str) -> PreferenceSignals {
        let signals = extract_preferences(message);
        if signals.is_empty() {
            return signals;
        }

        self.get_or_create_profile(customer_id).await;

        let to_values =
            |items: &[String]| items.iter().cloned().map(Value::String).collect::<Vec<_>>();
        let mut updates = Vec::new();
        if !signals.preferred_locations.is_empty() {
            updates.push(FieldUpdate::array_union(
                "preferences.preferred_locations",
                to_values(&signals.preferred_locations),
            ));
        }
        if !signals.amenities_of_interest.is_empty() {
            updates.push(FieldUpdate::array_union(
                "preferences.amenities_of_interest",
                to_values(&signals.amenities_of_interest),
            ));
        }

        if let Err(e) = self.store.update(&self.collections.customers, customer_id, updates).await {
            tracing::warn!("Failed to update preferences for {}: {}", customer_id, e);
        }

        signals
    }

    /// Stored profile for a customer, if any
    pub async fn customer_profile(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerProfile>, StoreError> {
        match self.store.get(&self.collections.customers, customer_id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Read the profile, writing a default one on first contact
    ///
    /// Store failures fall back to an unsaved default profile.
    async fn get_or_create_profile(&self, customer_id: &str) -> CustomerProfile {
        match self.customer_profile(customer_id).await {
            Ok(Some(profile)) => return profile,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to read profile for {}: {}", customer_id, e);
                return CustomerProfile::new(customer_id);
            }
        }

        let profile = CustomerProfile::new(customer_id);
        let created = match to_document(&profile) {
            Ok(data) => self.store.create(&self.collections.customers, customer_id, data).await,
            Err(e) => Err(e),
        };
        match created {
            Ok(()) => tracing::debug!("Created profile for {}", customer_id),
            Err(StoreError::AlreadyExists(_)) => {
                // Another request created it first; its counters are authoritative
                tracing::debug!("Profile for {} created concurrently", customer_id);
                match self.customer_profile(customer_id).await {
                    Ok(Some(stored)) => return stored,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Failed to re-read profile for {}: {}", customer_id, e)
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to create profile for {}: {}", customer_id, e),
        }
        profile
    }

    async fn apply_profile_updates(
        &self,
        customer_id: &str,
        reward: Option<&RewardEvent>,
        adjustment: &ProfileAdjustment,
        token_delta: i64,
    ) {
        let mut updates = Vec::new();

        if token_delta != 0 {
            updates.push(FieldUpdate::increment("tokens", token_delta));
        }
        if let Some(reward) = reward {
            match serde_json::to_value(reward) {
                Ok(value) => updates.push(FieldUpdate::array_union("rewards", vec![value])),
                Err(e) => tracing::warn!("Failed to encode reward for {}: {}", customer_id, e),
            }
        }
        if adjustment.positive_reviews != 0 {
            updates.push(FieldUpdate::increment(
                "positive_reviews_count",
                adjustment.positive_reviews,
            ));
        }
        if adjustment.negative_reviews != 0 {
            updates.push(FieldUpdate::increment(
                "negative_reviews_count",
                adjustment.negative_reviews,
            ));
        }
        if adjustment.mark_diabetic {
            updates.push(FieldUpdate::set("is_diabetic", true));
        }
        if adjustment.mark_asthmatic {
            updates.push(FieldUpdate::set("is_asthmatic", true));
        }

        if updates.is_empty() {
            return;
        }

        if let Err(e) = self.store.update(&self.collections.customers, customer_id, updates).await {
            tracing::warn!("Failed to update profile for {}: {}", customer_id, e);
        }
    }

    /// Publish tasks for the staff app; returns the ids that were written
    async fn send_tasks_to_staff(&self, tasks: &[Task]) -> Vec<String> {
        let mut ids = Vec::with_capacity(tasks.len());

        for task in tasks {
            let mut data = match to_document(task) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Failed to encode task: {}", e);
                    continue;
                }
            };
            // The staff app orders by the server timestamp
            data.remove("created_at");

            let transforms = vec![FieldUpdate::server_timestamp("timestamp")];
            match self.store.add(&self.collections.tasks, data, transforms).await {
                Ok(id) => ids.push(id),
                Err(e) => tracing::warn!("Failed to send task to {}: {}", task.role, e),
            }
        }

        ids
    }
}
