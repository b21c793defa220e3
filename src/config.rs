use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::Collections;
use crate::models::RewardValues;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firestore: FirestoreSettings,
    #[serde(default)]
    pub collections: CollectionSettings,
    #[serde(default)]
    pub rewards: RewardSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default = "default_firestore_url")]
    pub base_url: String,
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    /// Path to a service account key file; requests are unauthenticated without one
    pub credentials_path: Option<String>,
    /// Static bearer token, used by the emulator ("owner")
    pub access_token: Option<String>,
    pub page_size: Option<u32>,
}

fn default_firestore_url() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_database_id() -> String { "(default)".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_customers")]
    pub customers: String,
    #[serde(default = "default_hotels")]
    pub hotels: String,
    #[serde(default = "default_tasks")]
    pub tasks: String,
    #[serde(default = "default_scenarios")]
    pub scenarios: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            customers: default_customers(),
            hotels: default_hotels(),
            tasks: default_tasks(),
            scenarios: default_scenarios(),
        }
    }
}

fn default_customers() -> String { "customers".to_string() }
fn default_hotels() -> String { "hotels".to_string() }
fn default_tasks() -> String { "tasks".to_string() }
fn default_scenarios() -> String { "scenarios".to_string() }

impl From<CollectionSettings> for Collections {
    fn from(value: CollectionSettings) -> Self {
        Collections {
            customers: value.customers,
            hotels: value.hotels,
            tasks: value.tasks,
            scenarios: value.scenarios,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardSettings {
    #[serde(default = "default_light")]
    pub eco_action_light: i64,
    #[serde(default = "default_water")]
    pub eco_action_water: i64,
    #[serde(default = "default_transport")]
    pub eco_action_transport: i64,
    #[serde(default = "default_food")]
    pub eco_action_food: i64,
    #[serde(default = "default_zero_waste")]
    pub eco_action_zero_waste: i64,
    #[serde(default = "default_major")]
    pub eco_action_major: i64,
    #[serde(default = "default_positive_review")]
    pub positive_review: i64,
    #[serde(default = "default_politeness")]
    pub politeness: i64,
    #[serde(default = "default_penalty")]
    pub negative_feedback_penalty: i64,
    #[serde(default = "default_daily_bonus")]
    pub daily_bonus: f64,
    #[serde(default = "default_alert_threshold")]
    pub proactive_alert_threshold: i64,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            eco_action_light: default_light(),
            eco_action_water: default_water(),
            eco_action_transport: default_transport(),
            eco_action_food: default_food(),
            eco_action_zero_waste: default_zero_waste(),
            eco_action_major: default_major(),
            positive_review: default_positive_review(),
            politeness: default_politeness(),
            negative_feedback_penalty: default_penalty(),
            daily_bonus: default_daily_bonus(),
            proactive_alert_threshold: default_alert_threshold(),
        }
    }
}

fn default_light() -> i64 { 100 }
fn default_water() -> i64 { 200 }
fn default_transport() -> i64 { 250 }
fn default_food() -> i64 { 180 }
fn default_zero_waste() -> i64 { 150 }
fn default_major() -> i64 { 500 }
fn default_positive_review() -> i64 { 10 }
fn default_politeness() -> i64 { 2 }
fn default_penalty() -> i64 { 5 }
fn default_daily_bonus() -> f64 { 0.25 }
fn default_alert_threshold() -> i64 { 3 }

impl From<RewardSettings> for RewardValues {
    fn from(value: RewardSettings) -> Self {
        RewardValues {
            eco_action_light: value.eco_action_light,
            eco_action_water: value.eco_action_water,
            eco_action_transport: value.eco_action_transport,
            eco_action_food: value.eco_action_food,
            eco_action_zero_waste: value.eco_action_zero_waste,
            eco_action_major: value.eco_action_major,
            positive_review: value.positive_review,
            politeness: value.politeness,
            negative_feedback_penalty: value.negative_feedback_penalty,
            daily_bonus: value.daily_bonus,
            proactive_alert_threshold: value.proactive_alert_threshold,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ECO_PILOT__)
    /// 5. Well-known Google variables (FIRESTORE_EMULATOR_HOST, GOOGLE_APPLICATION_CREDENTIALS)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ECO_PILOT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ECO_PILOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_google_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ECO_PILOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_google_env(settings)?.try_deserialize()
    }
}

/// Honor the environment variables Google tooling already sets
fn apply_google_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(host) = env::var("FIRESTORE_EMULATOR_HOST") {
        builder = builder
            .set_override("firestore.base_url", format!("http://{}/v1", host))?
            .set_override("firestore.access_token", "owner")?;
    }
    if let Ok(path) = env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        builder = builder.set_override("firestore.credentials_path", path)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rewards() {
        let values: RewardValues = RewardSettings::default().into();
        assert_eq!(values, RewardValues::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 8090

[firestore]
project_id = "eco-pilot-test"

[rewards]
politeness = 3
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 8090);
        assert_eq!(settings.firestore.database_id, "(default)");
        assert_eq!(settings.collections.tasks, "tasks");
        assert_eq!(settings.rewards.politeness, 3);
        assert_eq!(settings.rewards.eco_action_major, 500);
    }
}
