//! Voice gallery endpoints
//!
//! Serves the curated catalog with facet filters and synthesizes prosody
//! previews for a chosen voice.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use ai_speech::ssml::Prosody;
use application::CatalogVoice;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wav_response;
use crate::error::ApiError;
use crate::state::AppState;

/// Gallery filter query parameters
#[derive(Debug, Default, Deserialize)]
pub struct VoiceQuery {
    /// Case-insensitive search over name and description
    pub search: Option<String>,
    /// Restrict to one locale
    pub locale: Option<String>,
    /// Restrict to one gender
    pub gender: Option<String>,
    /// Restrict to one age group
    pub age_group: Option<String>,
}

/// Gallery listing with facet values for the filter UI
#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<CatalogVoice>,
    pub total: usize,
    pub locales: Vec<String>,
    pub genders: Vec<String>,
    pub age_groups: Vec<String>,
}

/// Preview request: voice plus prosody slider values (0.5 - 2.0, 1.0 neutral)
#[derive(Debug, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1, message = "voice_name is required"))]
    pub voice_name: String,
    /// Defaults to the catalog entry's locale, then "en-US"
    pub locale: Option<String>,
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[validate(range(min = 0.5, max = 2.0))]
    pub rate: Option<f32>,
    #[validate(range(min = 0.5, max = 2.0))]
    pub pitch: Option<f32>,
    #[validate(range(min = 0.5, max = 2.0))]
    pub volume: Option<f32>,
}

/// `GET /v1/voices`
pub async fn list_voices(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
) -> Json<VoiceListResponse> {
    let filter = application::VoiceFilter {
        search: query.search,
        locales: query.locale.into_iter().collect(),
        genders: query.gender.into_iter().collect(),
        age_groups: query.age_group.into_iter().collect(),
    };

    let voices: Vec<CatalogVoice> = state
        .catalog
        .filter(&filter)
        .into_iter()
        .cloned()
        .collect();

    Json(VoiceListResponse {
        total: voices.len(),
        voices,
        locales: state.catalog.locales(),
        genders: state.catalog.genders(),
        age_groups: state.catalog.age_groups(),
    })
}

/// `POST /v1/voices/preview`
pub async fn preview_voice(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let locale = request
        .locale
        .clone()
        .or_else(|| {
            state
                .catalog
                .find(&request.voice_name)
                .map(|voice| voice.locale.clone())
        })
        .unwrap_or_else(|| "en-US".to_string());

    let prosody = Prosody {
        rate: request.rate.unwrap_or(1.0),
        pitch: request.pitch.unwrap_or(1.0),
        volume: request.volume.unwrap_or(1.0),
    };

    let service = state.synthesis_service()?;
    let outcome = service
        .preview_catalog_voice(&request.voice_name, &locale, &request.text, &prosody)
        .await?;

    Ok(wav_response(outcome.audio, outcome.processing_time_ms))
}
