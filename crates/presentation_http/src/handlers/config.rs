//! Configuration endpoints
//!
//! The persisted config holds the Speech key, so reads return a masked view;
//! updates persist atomically before the new value is published.

use axum::Json;
use axum::extract::State;
use domain::PersonalVoiceConfig;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::mask_secret;
use crate::error::ApiError;
use crate::state::AppState;

/// Masked view of the persisted configuration
#[derive(Debug, Serialize)]
pub struct ConfigView {
    speech_region: String,
    speech_key_masked: String,
    voice_name: String,
    language: String,
    selected_profile_id: Option<String>,
    profile_count: usize,
}

impl ConfigView {
    fn from_config(config: &PersonalVoiceConfig) -> Self {
        Self {
            speech_region: config.speech_region.clone(),
            speech_key_masked: mask_secret(config.speech_key.as_deref().unwrap_or_default(), 4),
            voice_name: config.voice_name.clone(),
            language: config.language.clone(),
            selected_profile_id: config.selected_profile_id.clone(),
            profile_count: config.profiles.len(),
        }
    }
}

/// Partial configuration update; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConfigRequest {
    pub speech_region: Option<String>,
    pub speech_key: Option<String>,
    #[validate(length(min = 1, message = "voice_name must not be empty"))]
    pub voice_name: Option<String>,
    #[validate(length(min = 1, message = "language must not be empty"))]
    pub language: Option<String>,
}

/// `GET /v1/config`
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigView> {
    Json(ConfigView::from_config(&state.snapshot()))
}

/// `PUT /v1/config`
pub async fn update_config(
    State(state): State<AppState>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<ConfigView>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let view = state.update_config(|config| {
        if let Some(region) = &request.speech_region {
            config.speech_region = region.trim().to_string();
        }
        if let Some(key) = &request.speech_key {
            let key = key.trim();
            config.speech_key = if key.is_empty() {
                None
            } else {
                Some(key.to_string())
            };
        }
        if let Some(voice_name) = &request.voice_name {
            config.voice_name = voice_name.trim().to_string();
        }
        if let Some(language) = &request.language {
            config.language = language.trim().to_string();
        }
        Ok(ConfigView::from_config(config))
    })?;

    Ok(Json(view))
}

/// `POST /v1/config/reload`
///
/// Discards the in-memory state and reloads from disk, re-running migration
/// and environment fill-in.
pub async fn reload_config(State(state): State<AppState>) -> Result<Json<ConfigView>, ApiError> {
    let reloaded = state.repository.load()?;
    let view = ConfigView::from_config(&reloaded);
    state.publish(reloaded);
    Ok(Json(view))
}
