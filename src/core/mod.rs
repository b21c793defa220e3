// Core pipeline exports
pub mod intent;
pub mod keywords;
pub mod personalize;
pub mod pilot;
pub mod preferences;
pub mod rewards;
pub mod tasks;
pub mod triage;

pub use intent::{recognize_intent, Intent};
pub use pilot::{Collections, DispatchOutcome, Pilot, PilotError};
pub use preferences::{extract_preferences, PreferenceSignals};
pub use personalize::{profile_adjustment, ProfileAdjustment};
pub use rewards::{
    allocate_reward, calculate_dynamic_reward, detect_eco_action, EcoAction,
    SUSTAINABLE_REWARD_LABEL,
};
pub use tasks::generate_tasks;
pub use triage::{triage_request, Category, Sentiment};
