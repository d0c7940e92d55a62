//! Speaker profile registry endpoints

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::SpeakerProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// One profile as served to the picker UI
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub creation_date: String,
    pub display_label: String,
    pub selected: bool,
}

impl ProfileView {
    fn new(profile: &SpeakerProfile, selected_id: Option<&str>) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            creation_date: profile.creation_date.clone(),
            display_label: profile.display_label(),
            selected: selected_id == Some(profile.id.as_str()),
        }
    }
}

/// Registry listing
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileView>,
    /// `(display_label, id)` pairs in insertion order, for select widgets
    pub choices: Vec<(String, String)>,
    pub selected_profile_id: Option<String>,
}

/// Create-profile input
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    /// Human label; blank falls back to a dated default
    #[serde(default)]
    pub name: String,
    /// Cloud-assigned speaker profile GUID
    #[validate(length(min = 1, message = "speaker_profile_id is required"))]
    pub speaker_profile_id: String,
}

/// Rename input
#[derive(Debug, Deserialize, Validate)]
pub struct RenameProfileRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

/// `GET /v1/profiles`
pub async fn list_profiles(State(state): State<AppState>) -> Json<ProfileListResponse> {
    let config = state.snapshot();
    let selected = config.selected_profile_id.as_deref();

    Json(ProfileListResponse {
        profiles: config
            .profiles
            .iter()
            .map(|profile| ProfileView::new(profile, selected))
            .collect(),
        choices: config.profile_choices(),
        selected_profile_id: config.selected_profile_id.clone(),
    })
}

/// `POST /v1/profiles`
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileView>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let profile = state.update_config(|config| {
        Ok(config.add_profile(&request.name, &request.speaker_profile_id))
    })?;

    let view = ProfileView::new(&profile, Some(profile.id.as_str()));
    Ok((StatusCode::CREATED, Json(view)))
}

/// `PUT /v1/profiles/{id}`
pub async fn rename_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenameProfileRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (profile, selected) = state.update_config(|config| {
        config.rename_profile(&id, &request.name)?;
        let profile = config
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| domain::DomainError::not_found("SpeakerProfile", &id))?;
        Ok((profile, config.selected_profile_id.clone()))
    })?;

    Ok(Json(ProfileView::new(&profile, selected.as_deref())))
}

/// `DELETE /v1/profiles/{id}`
pub async fn remove_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let removed = state.update_config(|config| config.remove_profile(&id))?;
    Ok(Json(ProfileView::new(&removed, None)))
}

/// `POST /v1/profiles/{id}/select`
pub async fn select_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    state.update_config(|config| config.select_profile(&id))?;

    Ok(list_profiles(State(state)).await)
}
