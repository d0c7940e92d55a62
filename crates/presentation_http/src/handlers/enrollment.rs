//! Personal Voice enrollment endpoint
//!
//! Accepts a multipart form with the enrollment ids, the consent audio, and
//! one or more prompt audio files, then runs the full project → consent →
//! personal-voice flow.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use ai_speech::UploadedAudio;
use application::EnrollmentRequest;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body returned after a successful enrollment
#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub speaker_profile_id: String,
    pub profile_id: String,
    pub profile_name: String,
    pub operation_id: Option<String>,
    pub processing_time_ms: u64,
}

#[derive(Default)]
struct FormData {
    project_id: String,
    consent_id: String,
    personal_voice_id: String,
    consent_locale: String,
    voice_talent_name: String,
    company_name: String,
    description: Option<String>,
    consent_audio: Option<UploadedAudio>,
    prompt_audio: Vec<UploadedAudio>,
}

async fn read_form(mut multipart: Multipart) -> Result<FormData, ApiError> {
    let mut form = FormData {
        consent_locale: "en-US".to_string(),
        ..FormData::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "project_id" => form.project_id = read_text(field).await?,
            "consent_id" => form.consent_id = read_text(field).await?,
            "personal_voice_id" => form.personal_voice_id = read_text(field).await?,
            "consent_locale" => form.consent_locale = read_text(field).await?,
            "voice_talent_name" => form.voice_talent_name = read_text(field).await?,
            "company_name" => form.company_name = read_text(field).await?,
            "description" => form.description = Some(read_text(field).await?),
            "consent_audio" => form.consent_audio = Some(read_audio(field).await?),
            "prompt_audio" => form.prompt_audio.push(read_audio(field).await?),
            _ => {},
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable form field: {e}")))
}

async fn read_audio(field: axum::extract::multipart::Field<'_>) -> Result<UploadedAudio, ApiError> {
    let filename = field.file_name().unwrap_or("upload.wav").to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable upload: {e}")))?;
    Ok(UploadedAudio::new(filename, bytes.to_vec(), content_type))
}

/// `POST /v1/personal-voices`
pub async fn create_personal_voice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let form = read_form(multipart).await?;

    let consent_audio = form
        .consent_audio
        .ok_or_else(|| ApiError::BadRequest("consent audio file is required".to_string()))?;

    let request = EnrollmentRequest {
        project_id: form.project_id,
        consent_id: form.consent_id,
        personal_voice_id: form.personal_voice_id,
        consent_locale: form.consent_locale,
        voice_talent_name: form.voice_talent_name,
        company_name: form.company_name,
        description: form.description,
        consent_audio,
        prompt_audio: form.prompt_audio,
    };

    let service = state.enrollment_service()?;
    let outcome = service.enroll(state.snapshot(), request).await?;

    // The service already persisted the updated config; publish it.
    let response = EnrollmentResponse {
        speaker_profile_id: outcome.speaker_profile_id.clone(),
        profile_id: outcome.profile.id.clone(),
        profile_name: outcome.profile.name.clone(),
        operation_id: outcome.operation_id.clone(),
        processing_time_ms: outcome.processing_time_ms,
    };
    state.publish(outcome.config);

    Ok((StatusCode::CREATED, Json(response)))
}
