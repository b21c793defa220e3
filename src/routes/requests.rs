use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{Pilot, PilotError};
use crate::models::{
    ErrorResponse, GuestRequest, HealthResponse, HotelsResponse, PreferenceUpdateRequest,
    PreferencesResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pilot: Pilot,
}

/// Configure all request-dispatch routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/hotels", web::get().to(list_hotels))
        .route("/requests", web::post().to(process_request))
        .route("/customers/{customer_id}", web::get().to(get_customer))
        .route("/customers/{customer_id}/preferences", web::post().to(update_preferences));
}

fn error_response(
    status: actix_web::http::StatusCode,
    error: &str,
    message: String,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let hotels_cached = state.pilot.hotels().len();
    let status = if hotels_cached > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        hotels_cached,
    })
}

/// Cached hotel directory
///
/// GET /api/v1/hotels
async fn list_hotels(state: web::Data<AppState>) -> impl Responder {
    let hotels: Vec<_> = state.pilot.hotels().sorted().into_iter().cloned().collect();
    let total = hotels.len();
    HttpResponse::Ok().json(HotelsResponse { hotels, total })
}

/// Triage a guest request and dispatch staff tasks
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// {
///   "customerId": "string",
///   "hotelId": "string",
///   "query": "string",
///   "type": "query|review|buzzer_request",
///   "durationDays": 1
/// }
/// ```
async fn process_request(
    state: web::Data<AppState>,
    req: web::Json<GuestRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for guest request: field_errors={:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    if let Some(kind) = &req.kind {
        tracing::debug!("Request channel: {}", kind);
    }

    match state.pilot.process_request(&req).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e @ PilotError::HotelNotFound(_)) => {
            error_response(actix_web::http::StatusCode::NOT_FOUND, "Hotel not found", e.to_string())
        }
    }
}

/// Stored customer profile
///
/// GET /api/v1/customers/{customer_id}
async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match state.pilot.customer_profile(&customer_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => error_response(
            actix_web::http::StatusCode::NOT_FOUND,
            "Customer not found",
            format!("No profile for customer {}", customer_id),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", customer_id, e);
            error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch customer profile",
                e.to_string(),
            )
        }
    }
}

/// Learn preferences from a guest message
///
/// POST /api/v1/customers/{customer_id}/preferences
///
/// Request body:
/// ```json
/// { "message": "string" }
/// ```
async fn update_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PreferenceUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let customer_id = path.into_inner();
    let signals = state.pilot.update_preferences(&customer_id, &req.message).await;

    HttpResponse::Ok().json(PreferencesResponse { customer_id, signals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Collections;
    use crate::models::{Hotel, RewardValues};
    use crate::services::{HotelDirectory, MemoryStore};
    use actix_web::{test, App};
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    fn state() -> AppState {
        let hotels = HotelDirectory::from_hotels(vec![Hotel {
            id: "hotel_17".to_string(),
            name: "Game Park Lodge".to_string(),
            amenities: vec!["Pool".to_string()],
            attributes: Map::new(),
        }]);
        AppState {
            pilot: Pilot::new(
                Arc::new(MemoryStore::new()),
                Arc::new(hotels),
                Collections::default(),
                RewardValues::default(),
            ),
        }
    }

    #[actix_web::test]
    async fn test_process_request_route() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/requests")
            .set_json(json!({
                "customerId": "customer_123",
                "hotelId": "hotel_17",
                "query": "Could you please help with a wifi issue?",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["category"], "service_request");
        assert_eq!(body["intent"], "tech_support");
        assert_eq!(body["tasks"][0]["role"], "IT Support");
        assert_eq!(body["tokenDelta"], 2);
    }

    #[actix_web::test]
    async fn test_unknown_hotel_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/requests")
            .set_json(json!({"customerId": "c1", "hotelId": "hotel_99", "query": "hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_validation_failure_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/requests")
            .set_json(json!({"customerId": "", "hotelId": "hotel_17", "query": "hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_preferences_then_profile() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/customers/c7/preferences")
            .set_json(json!({"message": "Any spa deals in Tokyo?"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["preferred_locations"], json!(["tokyo"]));

        let req = test::TestRequest::get().uri("/customers/c7").to_request();
        let profile: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(profile["preferences"]["amenities_of_interest"], json!(["spa"]));
        assert_eq!(profile["tokens"], 0);
    }
}
