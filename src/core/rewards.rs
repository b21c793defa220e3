use serde::{Deserialize, Serialize};

use super::keywords::{
    contains_any, FOOD_PHRASES, LIGHT_PHRASES, MAJOR_PHRASES, TRANSPORT_PHRASES, WATER_PHRASES,
    ZERO_WASTE_PHRASES,
};
use crate::models::{RewardEvent, RewardValues};

pub const SUSTAINABLE_REWARD_LABEL: &str = "Green & Sustainable Reward";

/// Recognized eco-friendly behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EcoAction {
    Water,
    Light,
    Transport,
    Food,
    ZeroWaste,
    Major,
}

const ECO_ACTION_TABLE: &[(EcoAction, &[&str])] = &[
    (EcoAction::Water, WATER_PHRASES),
    (EcoAction::Light, LIGHT_PHRASES),
    (EcoAction::Transport, TRANSPORT_PHRASES),
    (EcoAction::Food, FOOD_PHRASES),
    (EcoAction::ZeroWaste, ZERO_WASTE_PHRASES),
    (EcoAction::Major, MAJOR_PHRASES),
];

impl EcoAction {
    pub fn base_value(&self, values: &RewardValues) -> i64 {
        match self {
            EcoAction::Water => values.eco_action_water,
            EcoAction::Light => values.eco_action_light,
            EcoAction::Transport => values.eco_action_transport,
            EcoAction::Food => values.eco_action_food,
            EcoAction::ZeroWaste => values.eco_action_zero_waste,
            EcoAction::Major => values.eco_action_major,
        }
    }
}

/// First eco action phrase group matching the request
pub fn detect_eco_action(query: &str) -> Option<EcoAction> {
    let query = query.to_lowercase();
    ECO_ACTION_TABLE
        .iter()
        .find(|(_, phrases)| contains_any(&query, phrases))
        .map(|(action, _)| *action)
}

/// Reward for keeping an action up over several days
///
/// Each day after the first adds `daily_bonus` of the base value; the
/// result is truncated toward zero.
#[inline]
pub fn calculate_dynamic_reward(
    action: EcoAction,
    duration_days: u32,
    values: &RewardValues,
) -> i64 {
    let extra_days = duration_days.max(1) - 1;
    let multiplier = 1.0 + extra_days as f64 * values.daily_bonus;
    (action.base_value(values) as f64 * multiplier) as i64
}

/// Reward event for an eco-friendly request, if any phrase is recognized
pub fn allocate_reward(
    query: &str,
    duration_days: u32,
    values: &RewardValues,
) -> Option<RewardEvent> {
    let action = detect_eco_action(query)?;
    let tokens = calculate_dynamic_reward(action, duration_days, values);

    Some(RewardEvent {
        id: uuid::Uuid::new_v4().simple().to_string(),
        kind: SUSTAINABLE_REWARD_LABEL.to_string(),
        details: format!("{tokens} tokens for a sustainable action."),
        tokens,
    })
}
