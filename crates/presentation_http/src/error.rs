//! API error handling
//!
//! Maps application-layer errors onto HTTP status codes with a uniform body.
//! Internal details are logged, not leaked.

use ai_speech::SpeechError;
use application::{ApplicationError, ConfigStoreError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable error code
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
            ),
            Self::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
            Self::Internal(msg) => {
                error!(message = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    msg.clone(),
                )
            },
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Validation(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match &err {
            SpeechError::NotAvailable(_) => Self::ServiceUnavailable(err.to_string()),
            SpeechError::RateLimited => Self::RateLimited,
            SpeechError::AudioDurationOutOfRange { .. } | SpeechError::InvalidAudio(_) => {
                Self::BadRequest(err.to_string())
            },
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<ConfigStoreError> for ApiError {
    fn from(err: ConfigStoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(domain_err) => domain_err.into(),
            ApplicationError::Speech(speech_err) => speech_err.into(),
            ApplicationError::ConfigStore(store_err) => store_err.into(),
            ApplicationError::Document(document_err) => Self::Internal(document_err.to_string()),
            ApplicationError::Io(io_err) => Self::Internal(io_err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = ApiError::from(DomainError::validation("text is empty"));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(DomainError::not_found("SpeakerProfile", "p1"));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unavailable_provider_maps_to_503() {
        let err = ApiError::from(SpeechError::NotAvailable("azure-speech-tts".to_string()));
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn audio_duration_maps_to_bad_request() {
        let err = ApiError::from(SpeechError::AudioDurationOutOfRange {
            duration_ms: 1,
            min_ms: 5_000,
            max_ms: 90_000,
        });
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let err = ApiError::from(SpeechError::RateLimited);
        assert_eq!(status_of(err), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn config_store_errors_map_to_500() {
        let err = ApiError::from(ConfigStoreError::write("cfg.json", "disk full"));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn application_errors_unwrap_to_inner_mapping() {
        let err = ApiError::from(ApplicationError::Domain(DomainError::validation("bad")));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
