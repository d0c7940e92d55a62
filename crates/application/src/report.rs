//! Uniform result shape for service handlers
//!
//! Every cloud-facing call is normalized into a `ServiceReport`: a service
//! name plus either a payload or an error string. Transport errors never
//! propagate raw to the presentation layer. `processing_time_ms` is recorded
//! around the external call for display only.

use std::time::Duration;

use serde::Serialize;

/// Normalized outcome of one service call
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    /// Stable service identifier
    pub service: String,
    /// Whether the service had credentials at construction time
    pub available: bool,
    /// Payload fields on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Error description on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time spent in the external call
    pub processing_time_ms: u64,
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl ServiceReport {
    /// Successful call with a payload
    #[must_use]
    pub fn success(
        service: impl Into<String>,
        payload: serde_json::Value,
        elapsed: Duration,
    ) -> Self {
        Self {
            service: service.into(),
            available: true,
            payload: Some(payload),
            error: None,
            processing_time_ms: duration_ms(elapsed),
        }
    }

    /// Failed call with a captured error description
    #[must_use]
    pub fn failure(
        service: impl Into<String>,
        error: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            service: service.into(),
            available: true,
            payload: None,
            error: Some(error.into()),
            processing_time_ms: duration_ms(elapsed),
        }
    }

    /// Service skipped because its credentials are absent
    #[must_use]
    pub fn unavailable(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            available: false,
            payload: None,
            error: Some("service not configured".to_string()),
            processing_time_ms: 0,
        }
    }

    /// Whether the call produced a payload
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.payload.is_some()
    }
}
