//! HTTP handlers

pub mod config;
pub mod enrollment;
pub mod extraction;
pub mod health;
pub mod pricing;
pub mod profiles;
pub mod synthesis;
pub mod voices;

use axum::http::HeaderName;
use axum::http::header;
use axum::response::IntoResponse;

use ai_speech::AudioData;

/// Serve synthesized audio with its processing time attached as a header.
pub(crate) fn wav_response(audio: AudioData, processing_time_ms: u64) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                HeaderName::from_static("x-processing-time-ms"),
                processing_time_ms.to_string(),
            ),
        ],
        audio.into_data(),
    )
}

/// Mask a secret for display, keeping only the last few characters.
pub(crate) fn mask_secret(value: &str, show_last: usize) -> String {
    let stripped = value.trim();
    if stripped.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = stripped.chars().collect();
    if chars.len() <= show_last {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - show_last..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - show_last), visible)
}
