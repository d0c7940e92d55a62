//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::{handlers, state::AppState};

/// Upload limit: consent plus several prompt recordings
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Configuration (v1)
        .route(
            "/v1/config",
            get(handlers::config::get_config).put(handlers::config::update_config),
        )
        .route("/v1/config/reload", post(handlers::config::reload_config))
        // Speaker profile registry (v1)
        .route(
            "/v1/profiles",
            get(handlers::profiles::list_profiles).post(handlers::profiles::create_profile),
        )
        .route(
            "/v1/profiles/{id}",
            put(handlers::profiles::rename_profile).delete(handlers::profiles::remove_profile),
        )
        .route(
            "/v1/profiles/{id}/select",
            post(handlers::profiles::select_profile),
        )
        // Voice gallery (v1)
        .route("/v1/voices", get(handlers::voices::list_voices))
        .route("/v1/voices/preview", post(handlers::voices::preview_voice))
        // Synthesis (v1)
        .route("/v1/synthesize", post(handlers::synthesis::synthesize))
        // Personal Voice enrollment (v1)
        .route(
            "/v1/personal-voices",
            post(handlers::enrollment::create_personal_voice),
        )
        // Document extraction comparison (v1)
        .route("/v1/extract", post(handlers::extraction::extract_document))
        // Static pricing information (v1)
        .route("/v1/pricing", get(handlers::pricing::pricing))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Attach state
        .with_state(state)
}
