//! Health and readiness endpoints

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Readiness response: which integrations currently have credentials
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    speech_available: bool,
    extraction_services: Vec<ServiceAvailability>,
}

#[derive(Debug, Serialize)]
struct ServiceAvailability {
    service: &'static str,
    available: bool,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /ready`
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let extraction_services = state
        .extraction
        .services()
        .into_iter()
        .map(|(service, available)| ServiceAvailability { service, available })
        .collect();

    Json(ReadinessResponse {
        status: "ok",
        speech_available: state.speech_available(),
        extraction_services,
    })
}
