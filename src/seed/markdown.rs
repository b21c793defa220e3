use regex::Regex;
use std::sync::LazyLock;

use crate::models::Scenario;

const UNKNOWN: &str = "Unknown";

static HOTEL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Hotel: (.+?) \((.+?)\)\*\*").expect("Invalid regex: hotel header")
});

static SCENARIO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\. \*\*Scenario #(\d+):(.+?)earning \*\*(.+?) tokens\*\*")
        .expect("Invalid regex: scenario line")
});

static CLIENT_DETAILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Client (.+?) \(Budget: (.+?)\)").expect("Invalid regex: client details")
});

/// Parse eco scenarios from the scenario catalogue Markdown
///
/// Each `**Hotel: NAME (BUDGET)**` header applies to the scenario lines
/// below it. Lines whose number or token value do not parse are skipped.
pub fn parse_markdown_scenarios(content: &str) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let mut hotel_name = String::new();
    let mut hotel_budget = String::new();

    for line in content.lines() {
        if let Some(caps) = HOTEL_HEADER.captures(line) {
            hotel_name = caps[1].trim().to_string();
            hotel_budget = caps[2].replace("-End", "").trim().to_string();
            continue;
        }

        let Some(caps) = SCENARIO_LINE.captures(line) else {
            continue;
        };

        let id = match caps[1].parse::<u32>() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping scenario with bad number '{}': {}", &caps[1], e);
                continue;
            }
        };
        let tokens = match caps[4].replace(',', "").trim().parse::<i64>() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(
                    "Skipping scenario {} with bad token value '{}': {}",
                    id,
                    &caps[4],
                    e
                );
                continue;
            }
        };

        let description = caps[3].trim().to_string();
        let (client_name, client_budget) = match CLIENT_DETAILS.captures(&description) {
            Some(client) => (client[1].to_string(), client[2].to_string()),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };

        scenarios.push(Scenario {
            id,
            hotel_name: hotel_name.clone(),
            hotel_budget: hotel_budget.clone(),
            client_name,
            client_budget,
            description,
            tokens,
        });
    }

    tracing::debug!("Parsed {} scenarios", scenarios.len());
    scenarios
}
