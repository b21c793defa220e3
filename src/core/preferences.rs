use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::keywords::{PREFERENCE_AMENITIES, PREFERENCE_LOCATIONS};

type TermPatterns = Vec<(&'static str, Regex)>;

/// Whole-word pattern per term; multi-word terms match as a phrase
fn term_patterns(table: &'static [&'static str]) -> TermPatterns {
    table
        .iter()
        .map(|term| {
            let pattern = format!(r"\b{}\b", regex::escape(term));
            (*term, Regex::new(&pattern).expect("Invalid regex: preference term"))
        })
        .collect()
}

static LOCATION_PATTERNS: LazyLock<TermPatterns> =
    LazyLock::new(|| term_patterns(PREFERENCE_LOCATIONS));
static AMENITY_PATTERNS: LazyLock<TermPatterns> =
    LazyLock::new(|| term_patterns(PREFERENCE_AMENITIES));

/// Locations and amenities a guest mentioned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSignals {
    pub preferred_locations: Vec<String>,
    pub amenities_of_interest: Vec<String>,
}

impl PreferenceSignals {
    pub fn is_empty(&self) -> bool {
        self.preferred_locations.is_empty() && self.amenities_of_interest.is_empty()
    }
}

/// Scan a free-text message for known locations and amenities
pub fn extract_preferences(message: &str) -> PreferenceSignals {
    let message = message.to_lowercase();

    let collect = |patterns: &TermPatterns| -> Vec<String> {
        patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&message))
            .map(|(term, _)| term.to_string())
            .collect()
    };

    PreferenceSignals {
        preferred_locations: collect(&*LOCATION_PATTERNS),
        amenities_of_interest: collect(&*AMENITY_PATTERNS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_word_terms() {
        let signals = extract_preferences("Looking for a spa hotel in New York with room service");
        assert_eq!(signals.preferred_locations, vec!["new york"]);
        assert_eq!(signals.amenities_of_interest, vec!["spa", "room service"]);
    }

    #[test]
    fn test_terms_inside_other_words_are_ignored() {
        let signals = extract_preferences("We booked a superior room, it was barely spacious");
        assert!(signals.is_empty());
    }

    #[test]
    fn test_terms_next_to_punctuation() {
        let signals = extract_preferences("Rio, or maybe Rome? Only if there's a bar.");
        assert_eq!(signals.preferred_locations, vec!["rome", "rio"]);
        assert_eq!(signals.amenities_of_interest, vec!["bar"]);
    }

    #[test]
    fn test_no_signals() {
        assert!(extract_preferences("Just checking in").is_empty());
    }
}
