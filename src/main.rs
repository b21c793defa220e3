use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use eco_pilot::config::Settings;
use eco_pilot::core::Pilot;
use eco_pilot::routes::{self, requests::AppState};
use eco_pilot::services::{DocumentStore, FirestoreClient};
use std::sync::Arc;
use tracing::{info, error};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        HttpResponse::build(status).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    eco_pilot::logging::init();

    info!("Starting Eco Pilot dispatch service...");

    // Load configuration
    let settings = Settings::load().map_err(|e| io_error("Configuration error", e))?;

    info!("Configuration loaded successfully");

    // Initialize Firestore client
    let firestore = FirestoreClient::from_settings(&settings.firestore)
        .map_err(|e| io_error("Failed to initialize Firestore client", e))?;
    let store: Arc<dyn DocumentStore> = Arc::new(firestore);

    info!(
        "Firestore client initialized (project: {}, database: {})",
        settings.firestore.project_id, settings.firestore.database_id
    );

    // Hotels are read once; an empty directory still serves requests but rejects every hotel id
    let pilot = Pilot::load(store, settings.collections.into(), settings.rewards.into()).await;
    if pilot.hotels().is_empty() {
        error!("No hotels cached, every request will be rejected with 404");
    }

    info!("Pilot initialized with reward values: {:?}", pilot.reward_values());

    // Build application state
    let app_state = AppState { pilot };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
