//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech synthesis or enrollment
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to the speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid audio format or corrupted data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Prompt audio duration outside the accepted window
    #[error("Audio duration {duration_ms}ms outside accepted range {min_ms}-{max_ms}ms")]
    AudioDurationOutOfRange {
        /// Duration of the provided audio
        duration_ms: u64,
        /// Minimum accepted duration
        min_ms: u64,
        /// Maximum accepted duration
        max_ms: u64,
    },

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// An enrollment stage (project, consent, personal voice) failed
    #[error("Enrollment stage '{stage}' failed: {message}")]
    EnrollmentFailed { stage: String, message: String },

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during processing
    #[error("Speech request timeout after {0}ms")]
    Timeout(u64),

    /// A long-running operation did not reach a terminal state in time
    #[error("Operation {operation_id} did not complete in time")]
    OperationTimedOut { operation_id: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not available (credentials absent)
    #[error("Provider not available: {0}")]
    NotAvailable(String),
}

impl SpeechError {
    /// Create an enrollment-stage error
    pub fn enrollment(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnrollmentFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failed_error_message() {
        let err = SpeechError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn audio_duration_error_message() {
        let err = SpeechError::AudioDurationOutOfRange {
            duration_ms: 3_000,
            min_ms: 5_000,
            max_ms: 90_000,
        };
        assert_eq!(
            err.to_string(),
            "Audio duration 3000ms outside accepted range 5000-90000ms"
        );
    }

    #[test]
    fn enrollment_error_message() {
        let err = SpeechError::enrollment("consent", "HTTP 400");
        assert_eq!(err.to_string(), "Enrollment stage 'consent' failed: HTTP 400");
    }

    #[test]
    fn operation_timed_out_error_message() {
        let err = SpeechError::OperationTimedOut {
            operation_id: "op-1".to_string(),
        };
        assert_eq!(err.to_string(), "Operation op-1 did not complete in time");
    }

    #[test]
    fn not_available_error_message() {
        let err = SpeechError::NotAvailable("azure-tts".to_string());
        assert_eq!(err.to_string(), "Provider not available: azure-tts");
    }

    #[test]
    fn rate_limited_error_message() {
        let err = SpeechError::RateLimited;
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }
}
