//! Replay canned guest requests through the dispatch pipeline
//!
//! Run: cargo run --bin eco-pilot-simulate -- --clients 10 --delay-ms 0 --dry-run

use clap::Parser;
use eco_pilot::config::Settings;
use eco_pilot::core::{Collections, Pilot};
use eco_pilot::models::{GuestRequest, Hotel, RewardValues};
use eco_pilot::services::{DocumentStore, FirestoreClient, HotelDirectory, MemoryStore};
use rand::seq::SliceRandom;
use rand::Rng;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const HOTEL_COUNT: u32 = 15;

/// (type, query, duration in days)
const CANNED_REQUESTS: &[(&str, &str, u32)] = &[
    ("query", "Could you please help with a wifi issue?", 1),
    ("review", "The housekeeping service was excellent, thank you!", 1),
    ("query", "I need a diabetic-friendly meal plan for my stay.", 1),
    ("query", "I would like to opt out of daily linen changes for 3 days.", 3),
    ("query", "I am an asthmatic. I need a room away from allergens.", 1),
    ("buzzer_request", "Can I get some fresh towels?", 1),
    ("review", "The service was terribly slow.", 1),
];

/// Simulate guests sending requests to the Eco Pilot pipeline.
#[derive(Parser)]
#[command(name = "eco-pilot-simulate", version, about = "Simulate guest requests")]
struct Cli {
    /// Number of simulated clients.
    #[arg(long, default_value_t = 100)]
    clients: usize,

    /// Pause between requests in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Use an in-memory store with generated hotels instead of Firestore.
    #[arg(long)]
    dry_run: bool,
}

fn simulated_hotels() -> HotelDirectory {
    HotelDirectory::from_hotels((1..=HOTEL_COUNT).map(|i| Hotel {
        id: format!("hotel_{}", i),
        name: format!("Simulated Hotel {}", i),
        amenities: Vec::new(),
        attributes: Default::default(),
    }))
}

async fn build_pilot(dry_run: bool) -> Result<Pilot, String> {
    if dry_run {
        tracing::info!("Dry run: using in-memory store");
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        return Ok(Pilot::new(
            store,
            Arc::new(simulated_hotels()),
            Collections::default(),
            RewardValues::default(),
        ));
    }

    let settings = Settings::load().map_err(|e| format!("Configuration error: {}", e))?;
    let firestore = FirestoreClient::from_settings(&settings.firestore)
        .map_err(|e| format!("Failed to initialize Firestore client: {}", e))?;
    Ok(Pilot::load(Arc::new(firestore), settings.collections.into(), settings.rewards.into()).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    eco_pilot::logging::init();

    let cli = Cli::parse();
    let pilot = match build_pilot(cli.dry_run).await {
        Ok(pilot) => pilot,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting client interaction simulation...");

    let mut processed = 0usize;
    let mut rejected = 0usize;

    for i in 0..cli.clients {
        let customer_id = format!("client_{:03}", i);
        let (hotel_id, requests) = {
            let mut rng = rand::thread_rng();
            let hotel_id = format!("hotel_{}", rng.gen_range(1..=HOTEL_COUNT));
            let amount = rng.gen_range(1..=CANNED_REQUESTS.len());
            let requests: Vec<_> = CANNED_REQUESTS
                .choose_multiple(&mut rng, amount)
                .copied()
                .collect();
            (hotel_id, requests)
        };

        for (kind, query, days) in requests {
            tracing::info!("Simulating request from {} at {}", customer_id, hotel_id);

            let request = GuestRequest::new(&customer_id, &hotel_id, query)
                .with_kind(kind)
                .with_duration(days);
            match pilot.process_request(&request).await {
                Ok(outcome) => {
                    processed += 1;
                    tracing::info!(
                        "{} -> {} / {} ({} tasks, {:+} tokens)",
                        customer_id,
                        outcome.category,
                        outcome.intent,
                        outcome.tasks.len(),
                        outcome.token_delta
                    );
                }
                Err(e) => {
                    rejected += 1;
                    tracing::warn!("Request from {} rejected: {}", customer_id, e);
                }
            }

            if cli.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(cli.delay_ms)).await;
            }
        }
    }

    tracing::info!(
        "Simulation complete: {} requests processed, {} rejected",
        processed,
        rejected
    );

    ExitCode::SUCCESS
}
