//! Keyword tables for the triage pipeline.
//!
//! Every entry is lowercase and matched as a plain substring of the
//! lowercased request. Tables are scanned in declaration order and the
//! first hit wins.

use super::triage::Category;

pub const SERVICE_KEYWORDS: &[&str] = &[
    "wi-fi",
    "wifi",
    "internet",
    "clean",
    "housekeeping",
    "laundry",
    "maintenance",
    "broken",
    "leak",
    "booking",
    "check-in",
    "check-out",
    "room service",
    "dining",
    "meal",
    "buzzer",
    "towels",
    "menu",
];

pub const ECO_KEYWORDS: &[&str] = &[
    "opt out",
    "reuse towels",
    "no linen",
    "turn off lights",
    "ac down",
    "natural light",
    "bike rental",
    "bus pass",
    "car-sharing",
    "vegan",
    "local food",
    "no-meat",
    "digital receipt",
    "no paper",
    "zero-waste",
    "park clean-up",
    "coral reef planting",
    "tree planting",
    "sustainable",
];

pub const REVIEW_KEYWORDS: &[&str] = &[
    "review",
    "feedback",
    "happy",
    "unhappy",
    "disappointed",
    "excellent",
    "great",
    "poor",
];

pub const MEDICAL_KEYWORDS: &[&str] = &[
    "diabetic",
    "asthmatic",
    "medical condition",
    "therapeutic nutrition",
];

/// Category table in priority order
pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::ServiceRequest, SERVICE_KEYWORDS),
    (Category::EcoRequest, ECO_KEYWORDS),
    (Category::Review, REVIEW_KEYWORDS),
    (Category::MedicalAlert, MEDICAL_KEYWORDS),
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "poor",
    "slow",
    "bad",
    "unhappy",
    "dirty",
    "broken",
    "disappointing",
    "rude",
    "unresolved",
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "great",
    "fast",
    "happy",
    "clean",
    "wonderful",
    "professional",
    "helpful",
];

/// Entity keywords grouped by type: staff, amenity, room, food
pub const ENTITY_TABLE: &[(&str, &[&str])] = &[
    ("staff", &["front desk staff", "housekeeping", "chef", "concierge", "attendant"]),
    ("amenity", &["wi-fi", "internet", "pool", "gym"]),
    ("room", &["room", "bed", "bathroom"]),
    ("food", &["meal", "food", "breakfast", "dinner"]),
];

pub const POLITENESS_PHRASES: &[&str] = &["please", "thank you"];

pub const WATER_PHRASES: &[&str] = &["opt out of", "no linen", "reuse towels"];
pub const LIGHT_PHRASES: &[&str] = &["turn off lights", "ac down", "natural light"];
pub const TRANSPORT_PHRASES: &[&str] = &["bike rental", "bus pass", "car-sharing"];
pub const FOOD_PHRASES: &[&str] = &["vegan", "local food", "no-meat", "sustainable"];
pub const ZERO_WASTE_PHRASES: &[&str] = &["digital receipt", "no paper", "zero-waste"];
pub const MAJOR_PHRASES: &[&str] = &["park clean-up", "coral reef planting", "tree planting"];

pub const PREFERENCE_LOCATIONS: &[&str] = &[
    "new york", "london", "paris", "tokyo", "sydney", "rome", "dubai", "rio",
];

pub const PREFERENCE_AMENITIES: &[&str] = &[
    "wi-fi",
    "pool",
    "gym",
    "restaurant",
    "bar",
    "spa",
    "lounge",
    "conference room",
    "room service",
    "laundry",
];

/// True if any keyword occurs in `text`
///
/// `text` must already be lowercased.
#[inline]
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
