//! Seed the hotels and scenarios collections
//!
//! Run: cargo run --bin eco-pilot-seed -- hotels data/hotels_data.json

use clap::{Parser, Subcommand};
use eco_pilot::config::Settings;
use eco_pilot::seed::{self, SeedError};
use eco_pilot::services::{to_document, FirestoreClient};
use std::path::PathBuf;
use std::process::ExitCode;

/// Upload Eco Pilot reference data to Firestore.
#[derive(Parser)]
#[command(name = "eco-pilot-seed", version, about = "Upload Eco Pilot reference data to Firestore")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a JSON array of hotels.
    Hotels {
        /// Path to the hotels JSON file.
        path: PathBuf,

        /// Field holding the document id; `id` is used when it is missing.
        #[arg(long, default_value = "hotel_id")]
        id_field: String,
    },

    /// Parse and upload the eco scenario catalogue Markdown.
    Scenarios {
        /// Path to the scenarios Markdown file.
        path: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<(), SeedError> {
    let settings = Settings::load()?;
    let store = FirestoreClient::from_settings(&settings.firestore)?;
    let collections = settings.collections;

    match cli.command {
        Commands::Hotels { path, id_field } => {
            let records = seed::load_records(&path)?;
            let id_fields = [id_field.as_str(), "id"];
            let summary =
                seed::upload_collection(&store, &collections.hotels, records, &id_fields).await?;
            println!("Uploaded {} hotels ({} skipped)", summary.uploaded, summary.skipped);
        }
        Commands::Scenarios { path } => {
            let content = std::fs::read_to_string(&path)?;
            let records = seed::parse_markdown_scenarios(&content)
                .iter()
                .map(to_document)
                .collect::<Result<Vec<_>, _>>()?;
            let summary =
                seed::upload_collection(&store, &collections.scenarios, records, &["id"]).await?;
            println!("Uploaded {} scenarios ({} skipped)", summary.uploaded, summary.skipped);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    eco_pilot::logging::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
