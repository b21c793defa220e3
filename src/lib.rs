//! Eco Pilot - guest request triage and staff task dispatch
//!
//! This library provides the rule-based pipeline used by the Eco Pilot
//! hotel operations app: keyword triage, intent recognition, staff task
//! generation and loyalty token rewards, backed by a Firestore document store.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    allocate_reward, generate_tasks, recognize_intent, triage_request, Category, DispatchOutcome,
    Intent, Pilot, Sentiment,
};
pub use crate::models::{CustomerProfile, Hotel, Task, RewardEvent, RewardValues, GuestRequest};
