use serde::{Deserialize, Serialize};
use std::fmt;

use super::keywords::{contains_any, ENTITY_TABLE};
use super::triage::Category;

/// Second-pass sub-category of a triaged request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GeneralInquiry,
    TechSupport,
    HousekeepingRequest,
    MaintenanceIssue,
    FoodOrder,
    RealtimeService,
    EcoHousekeeping,
    EcoTransport,
    EcoFood,
    EcoDonation,
    DiabeticCare,
    AsthmaCare,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::GeneralInquiry => "general_inquiry",
            Intent::TechSupport => "tech_support",
            Intent::HousekeepingRequest => "housekeeping_request",
            Intent::MaintenanceIssue => "maintenance_issue",
            Intent::FoodOrder => "food_order",
            Intent::RealtimeService => "realtime_service",
            Intent::EcoHousekeeping => "eco_housekeeping",
            Intent::EcoTransport => "eco_transport",
            Intent::EcoFood => "eco_food",
            Intent::EcoDonation => "eco_donation",
            Intent::DiabeticCare => "diabetic_care",
            Intent::AsthmaCare => "asthma_care",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule within a category: any keyword selects the intent and tags the
/// optional entity.
struct IntentRule {
    keywords: &'static [&'static str],
    intent: Intent,
    entity: Option<&'static str>,
}

const SERVICE_RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["wi-fi", "wifi", "internet"],
        intent: Intent::TechSupport,
        entity: Some("Wi-Fi"),
    },
    IntentRule {
        keywords: &["clean", "housekeeping"],
        intent: Intent::HousekeepingRequest,
        entity: Some("cleaning"),
    },
    IntentRule {
        keywords: &["maintenance", "broken"],
        intent: Intent::MaintenanceIssue,
        entity: Some("maintenance"),
    },
    IntentRule {
        keywords: &["meal", "dining", "menu"],
        intent: Intent::FoodOrder,
        entity: Some("food"),
    },
    IntentRule {
        keywords: &["buzzer", "towels"],
        intent: Intent::RealtimeService,
        entity: None,
    },
];

const ECO_RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["opt out", "reuse"],
        intent: Intent::EcoHousekeeping,
        entity: None,
    },
    IntentRule {
        keywords: &["transport", "bike"],
        intent: Intent::EcoTransport,
        entity: None,
    },
    IntentRule {
        keywords: &["vegan", "local food", "sustainable"],
        intent: Intent::EcoFood,
        entity: None,
    },
    IntentRule {
        keywords: &["donation"],
        intent: Intent::EcoDonation,
        entity: None,
    },
];

const MEDICAL_RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["diabetic", "therapeutic nutrition"],
        intent: Intent::DiabeticCare,
        entity: None,
    },
    IntentRule {
        keywords: &["asthmatic"],
        intent: Intent::AsthmaCare,
        entity: None,
    },
];

fn rules_for(category: Category) -> &'static [IntentRule] {
    match category {
        Category::ServiceRequest => SERVICE_RULES,
        Category::EcoRequest => ECO_RULES,
        Category::MedicalAlert => MEDICAL_RULES,
        Category::Review | Category::Unknown => &[],
    }
}

/// Derive the intent and the mentioned entities for a triaged request
///
/// Entities are the intent's own tag (if any) followed by every entity
/// keyword present in the query, in table order.
pub fn recognize_intent(query: &str, category: Category) -> (Intent, Vec<String>) {
    let query = query.to_lowercase();
    let mut entities = Vec::new();

    let intent = match rules_for(category)
        .iter()
        .find(|rule| contains_any(&query, rule.keywords))
    {
        Some(rule) => {
            if let Some(entity) = rule.entity {
                entities.push(entity.to_string());
            }
            rule.intent
        }
        None => Intent::GeneralInquiry,
    };

    for (_, keywords) in ENTITY_TABLE {
        entities.extend(
            keywords
                .iter()
                .filter(|keyword| query.contains(*keyword))
                .map(|keyword| keyword.to_string()),
        );
    }

    (intent, entities)
}
