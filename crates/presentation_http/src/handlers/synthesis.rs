//! Personal Voice synthesis endpoint

use axum::Json;
use axum::extract::State;
use axum::http::HeaderName;
use axum::response::{IntoResponse, Response};
use application::SynthesisRequest;
use serde::Deserialize;
use validator::Validate;

use super::wav_response;
use crate::error::ApiError;
use crate::state::AppState;

/// Synthesis input
#[derive(Debug, Deserialize, Validate)]
pub struct SynthesizeRequest {
    /// Text to speak with the selected profile
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    /// Output filename under the configured output directory; plain names
    /// only
    pub output_name: Option<String>,
}

fn sanitize_output_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(ApiError::BadRequest(
            "output_name must be a plain file name".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// `POST /v1/synthesize`
///
/// Returns the WAV bytes directly; the persisted copy's path travels in the
/// `x-output-path` header.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let output_name = match request.output_name.as_deref() {
        Some(name) => sanitize_output_name(name)?,
        None => "personal_voice_output.wav".to_string(),
    };
    let output_path = state.settings.storage.output_dir.join(output_name);

    let config = state.snapshot();
    let service = state.synthesis_service()?;
    let outcome = service
        .synthesize_personal_voice(
            &config,
            &SynthesisRequest {
                text: request.text,
                output_path: Some(output_path.clone()),
            },
        )
        .await?;

    let mut response = wav_response(outcome.audio, outcome.processing_time_ms).into_response();
    if let Ok(value) = output_path.display().to_string().parse() {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-output-path"), value);
    }
    Ok(response)
}
