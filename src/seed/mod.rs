//! Reference data ingestion for the hotels and scenarios collections

pub mod markdown;
pub mod upload;

use thiserror::Error;

use crate::services::StoreError;

pub use markdown::parse_markdown_scenarios;
pub use upload::{load_records, upload_collection, UploadSummary, MAX_BATCH_WRITES};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid seed data: {0}")]
    Invalid(String),
}
