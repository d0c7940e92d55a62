//! Custom Voice REST client for Personal Voice enrollment
//!
//! Drives the project / consent / personal-voice resources under
//! `https://<region>.api.cognitive.microsoft.com/customvoice`. Consent and
//! personal-voice creation are async on the service side; the operation id is
//! parsed from the `Operation-Id` or `Operation-Location` response headers
//! and polled until terminal.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

use crate::config::AzureSpeechConfig;
use crate::error::SpeechError;
use crate::ports::{
    ConsentReceipt, ConsentUpload, OperationState, OperationStatus, PersonalVoiceReceipt,
    PersonalVoiceUpload, VoiceEnrollment,
};
use crate::types::UploadedAudio;

/// Custom Voice REST client
#[derive(Debug, Clone)]
pub struct CustomVoiceClient {
    client: Client,
    config: AzureSpeechConfig,
    available: bool,
}

/// Extract the operation id from the `Operation-Id` header, or from the
/// trailing path segment after `operations` in `Operation-Location`.
#[must_use]
pub fn parse_operation_id(
    operation_location: Option<&str>,
    operation_id: Option<&str>,
) -> Option<String> {
    if let Some(id) = operation_id {
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }
    let location = operation_location?;
    let path = location.split('?').next().unwrap_or(location);
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments
        .by_ref()
        .find(|segment| *segment == "operations")?;
    segments.next().map(ToString::to_string)
}

fn operation_headers(response: &Response) -> Option<String> {
    let location = response
        .headers()
        .get("Operation-Location")
        .and_then(|v| v.to_str().ok());
    let id = response
        .headers()
        .get("Operation-Id")
        .and_then(|v| v.to_str().ok());
    parse_operation_id(location, id)
}

fn audio_part(audio: &UploadedAudio) -> Result<Part, SpeechError> {
    Part::bytes(audio.content.clone())
        .file_name(audio.filename.clone())
        .mime_str(audio.mime_type())
        .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))
}

impl CustomVoiceClient {
    /// Create a new client.
    ///
    /// Missing credentials do not fail construction; the client reports
    /// itself unavailable instead.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is
    /// internally inconsistent or the HTTP client cannot be built.
    pub fn new(config: AzureSpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let available = config.is_configured();

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            available,
        })
    }

    fn ensure_available(&self) -> Result<(), SpeechError> {
        if self.available {
            Ok(())
        } else {
            Err(SpeechError::NotAvailable(
                "azure-custom-voice (missing key or region)".to_string(),
            ))
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/customvoice/{resource}", self.config.management_host())
    }

    fn api_version(&self) -> [(&'static str, String); 1] {
        [(
            "api-version",
            self.config.custom_voice_api_version.clone(),
        )]
    }

    async fn body_json(response: Response) -> serde_json::Value {
        // The service occasionally answers with plain text; mirror it into a
        // JSON object so callers always get structured data.
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "raw": text }))
    }

    /// Fetch a consent resource by id.
    async fn consent(&self, consent_id: &str) -> Result<serde_json::Value, SpeechError> {
        self.ensure_available()?;

        let request = self
            .client
            .get(self.url(&format!("consents/{consent_id}")))
            .query(&self.api_version());
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let body = Self::body_json(response).await;
        if status.as_u16() == 200 {
            Ok(body)
        } else {
            Err(SpeechError::enrollment(
                "consent",
                format!("HTTP {status}: {body}"),
            ))
        }
    }
}

#[async_trait]
impl VoiceEnrollment for CustomVoiceClient {
    #[instrument(skip(self))]
    async fn create_project(
        &self,
        project_id: &str,
        display_name: Option<&str>,
        description: Option<&str>,
    ) -> Result<serde_json::Value, SpeechError> {
        self.ensure_available()?;
        if project_id.trim().is_empty() {
            return Err(SpeechError::enrollment("project", "project id is required"));
        }

        let mut payload = serde_json::json!({ "kind": "PersonalVoice" });
        if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
            payload["displayName"] = serde_json::Value::String(name.trim().to_string());
        }
        if let Some(text) = description.filter(|d| !d.trim().is_empty()) {
            payload["description"] = serde_json::Value::String(text.trim().to_string());
        }

        let request = self
            .client
            .put(self.url(&format!("projects/{project_id}")))
            .query(&self.api_version())
            .json(&payload);
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let body = Self::body_json(response).await;
        if matches!(status.as_u16(), 200 | 201) {
            debug!(%project_id, "Custom Voice project ready");
            Ok(body)
        } else {
            Err(SpeechError::enrollment(
                "project",
                format!("HTTP {status}: {body}"),
            ))
        }
    }

    #[instrument(skip(self, upload), fields(consent_id = %upload.consent_id))]
    async fn upload_consent(&self, upload: &ConsentUpload) -> Result<ConsentReceipt, SpeechError> {
        self.ensure_available()?;
        if upload.audio.is_empty() {
            return Err(SpeechError::InvalidAudio(
                "consent audio is empty".to_string(),
            ));
        }

        let mut form = Form::new()
            .text("projectId", upload.project_id.clone())
            .text("voiceTalentName", upload.voice_talent_name.clone())
            .text("companyName", upload.company_name.clone())
            .text("locale", upload.locale.clone())
            .part("audiodata", audio_part(&upload.audio)?);
        if let Some(description) = upload.description.as_ref().filter(|d| !d.trim().is_empty()) {
            form = form.text("description", description.trim().to_string());
        }

        let request = self
            .client
            .post(self.url(&format!("consents/{}", upload.consent_id)))
            .query(&self.api_version())
            .multipart(form);
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let operation_id = operation_headers(&response);
        let body = Self::body_json(response).await;

        // Consent ids are user-provided; an existing id is an idempotent
        // success, resolved by fetching the existing resource.
        if status.as_u16() == 409 {
            warn!(consent_id = %upload.consent_id, "consent already exists, reusing");
            let existing = self.consent(&upload.consent_id).await?;
            return Ok(ConsentReceipt {
                body: existing,
                operation_id: None,
                reused_existing: true,
            });
        }

        if matches!(status.as_u16(), 200 | 201) {
            Ok(ConsentReceipt {
                body,
                operation_id,
                reused_existing: false,
            })
        } else {
            Err(SpeechError::enrollment(
                "consent",
                format!("HTTP {status}: {body}"),
            ))
        }
    }

    #[instrument(skip(self, upload), fields(personal_voice_id = %upload.personal_voice_id, prompts = upload.prompts.len()))]
    async fn create_personal_voice(
        &self,
        upload: &PersonalVoiceUpload,
    ) -> Result<PersonalVoiceReceipt, SpeechError> {
        self.ensure_available()?;
        if upload.prompts.is_empty() {
            return Err(SpeechError::enrollment(
                "personal-voice",
                "at least one prompt audio file is required",
            ));
        }

        let mut form = Form::new()
            .text("projectId", upload.project_id.clone())
            .text("consentId", upload.consent_id.clone());
        if let Some(description) = upload.description.as_ref().filter(|d| !d.trim().is_empty()) {
            form = form.text("description", description.trim().to_string());
        }
        // Multiple 'audiodata' parts in a single multipart request
        for prompt in &upload.prompts {
            form = form.part("audiodata", audio_part(prompt)?);
        }

        let request = self
            .client
            .post(self.url(&format!("personalvoices/{}", upload.personal_voice_id)))
            .query(&self.api_version())
            .multipart(form);
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let operation_id = operation_headers(&response);
        let body = Self::body_json(response).await;

        if matches!(status.as_u16(), 200 | 201) {
            let speaker_profile_id = body
                .get("speakerProfileId")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string);
            Ok(PersonalVoiceReceipt {
                body,
                speaker_profile_id,
                operation_id,
            })
        } else {
            Err(SpeechError::enrollment(
                "personal-voice",
                format!("HTTP {status}: {body}"),
            ))
        }
    }

    async fn operation(&self, operation_id: &str) -> Result<OperationStatus, SpeechError> {
        self.ensure_available()?;

        let request = self
            .client
            .get(self.url(&format!("operations/{operation_id}")))
            .query(&self.api_version());
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let body = Self::body_json(response).await;
        if status.as_u16() != 200 {
            return Err(SpeechError::enrollment(
                "operation",
                format!("HTTP {status}: {body}"),
            ));
        }

        let state = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map_or(OperationState::NotStarted, OperationState::parse);
        Ok(OperationStatus {
            id: operation_id.to_string(),
            status: state,
        })
    }

    #[instrument(skip(self))]
    async fn wait_for_operation(
        &self,
        operation_id: &str,
    ) -> Result<OperationStatus, SpeechError> {
        let started = Instant::now();
        let deadline = Duration::from_millis(self.config.poll_timeout_ms);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            let status = self.operation(operation_id).await?;
            if status.status.is_terminal() {
                return Ok(status);
            }
            if started.elapsed() > deadline {
                return Err(SpeechError::OperationTimedOut {
                    operation_id: operation_id.to_string(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn personal_voice(
        &self,
        personal_voice_id: &str,
    ) -> Result<PersonalVoiceReceipt, SpeechError> {
        self.ensure_available()?;

        let request = self
            .client
            .get(self.url(&format!("personalvoices/{personal_voice_id}")))
            .query(&self.api_version());
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        let body = Self::body_json(response).await;
        if status.as_u16() != 200 {
            return Err(SpeechError::enrollment(
                "personal-voice",
                format!("HTTP {status}: {body}"),
            ));
        }

        let speaker_profile_id = body
            .get("speakerProfileId")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);
        Ok(PersonalVoiceReceipt {
            body,
            speaker_profile_id,
            operation_id: None,
        })
    }

    fn available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(mock_server: &MockServer) -> CustomVoiceClient {
        CustomVoiceClient::new(AzureSpeechConfig::test(&mock_server.uri())).unwrap()
    }

    fn consent_upload() -> ConsentUpload {
        ConsentUpload {
            consent_id: "c1".to_string(),
            project_id: "p1".to_string(),
            voice_talent_name: "Jessica Smith".to_string(),
            company_name: "Contoso".to_string(),
            locale: "en-US".to_string(),
            description: None,
            audio: UploadedAudio::new("consent.wav", b"RIFF....WAVE".to_vec(), "audio/wav"),
        }
    }

    mod operation_id_parsing {
        use super::*;

        #[test]
        fn explicit_header_wins() {
            assert_eq!(
                parse_operation_id(Some("https://x/operations/a"), Some("op-9")),
                Some("op-9".to_string())
            );
        }

        #[test]
        fn parsed_from_location_path() {
            let location = "https://eastus.api.cognitive.microsoft.com/customvoice/operations/op-1?api-version=2024-02-01-preview";
            assert_eq!(
                parse_operation_id(Some(location), None),
                Some("op-1".to_string())
            );
        }

        #[test]
        fn missing_segment_yields_none() {
            assert_eq!(parse_operation_id(Some("https://x/consents/c1"), None), None);
            assert_eq!(parse_operation_id(None, None), None);
        }
    }

    #[tokio::test]
    async fn create_project_puts_personal_voice_kind() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/customvoice/projects/p1"))
            .and(query_param("api-version", "2024-02-01-preview"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .and(body_string_contains("PersonalVoice"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "p1",
                "kind": "PersonalVoice"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let project = client.create_project("p1", None, Some("demo")).await.unwrap();

        assert_eq!(project["kind"], "PersonalVoice");
    }

    #[tokio::test]
    async fn create_project_rejects_blank_id_locally() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);

        let err = client.create_project("  ", None, None).await.unwrap_err();
        assert!(matches!(err, SpeechError::EnrollmentFailed { .. }));
    }

    #[tokio::test]
    async fn upload_consent_sends_multipart_and_captures_operation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customvoice/consents/c1"))
            .and(body_string_contains("voiceTalentName"))
            .and(body_string_contains("audiodata"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header(
                        "Operation-Location",
                        format!(
                            "{}/customvoice/operations/op-consent-1?api-version=2024-02-01-preview",
                            mock_server.uri()
                        )
                        .as_str(),
                    )
                    .set_body_json(serde_json::json!({ "id": "c1", "status": "NotStarted" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let receipt = client.upload_consent(&consent_upload()).await.unwrap();

        assert!(!receipt.reused_existing);
        assert_eq!(receipt.operation_id.as_deref(), Some("op-consent-1"));
        assert_eq!(receipt.body["id"], "c1");
    }

    #[tokio::test]
    async fn consent_conflict_reuses_existing_resource() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customvoice/consents/c1"))
            .respond_with(
                ResponseTemplate::new(409).set_body_string("Resource Id already exists."),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/customvoice/consents/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c1",
                "status": "Succeeded"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let receipt = client.upload_consent(&consent_upload()).await.unwrap();

        assert!(receipt.reused_existing);
        assert_eq!(receipt.body["status"], "Succeeded");
    }

    #[tokio::test]
    async fn create_personal_voice_returns_speaker_profile_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customvoice/personalvoices/pv1"))
            .and(body_string_contains("consentId"))
            .and(body_string_contains("audiodata"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Operation-Id", "op-pv-1")
                    .set_body_json(serde_json::json!({
                        "id": "pv1",
                        "speakerProfileId": "spid-123",
                        "status": "NotStarted"
                    })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let upload = PersonalVoiceUpload {
            personal_voice_id: "pv1".to_string(),
            project_id: "p1".to_string(),
            consent_id: "c1".to_string(),
            description: None,
            prompts: vec![
                UploadedAudio::new("p1.wav", b"RIFF....WAVE".to_vec(), "audio/wav"),
                UploadedAudio::new("p2.wav", b"RIFF....WAVE".to_vec(), "audio/wav"),
            ],
        };
        let receipt = client.create_personal_voice(&upload).await.unwrap();

        assert_eq!(receipt.speaker_profile_id.as_deref(), Some("spid-123"));
        assert_eq!(receipt.operation_id.as_deref(), Some("op-pv-1"));
    }

    #[tokio::test]
    async fn create_personal_voice_requires_prompts() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);

        let upload = PersonalVoiceUpload {
            personal_voice_id: "pv1".to_string(),
            project_id: "p1".to_string(),
            consent_id: "c1".to_string(),
            description: None,
            prompts: Vec::new(),
        };

        let err = client.create_personal_voice(&upload).await.unwrap_err();
        assert!(matches!(err, SpeechError::EnrollmentFailed { .. }));
    }

    #[tokio::test]
    async fn wait_for_operation_polls_until_terminal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customvoice/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "op-1",
                "status": "Running"
            })))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/customvoice/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "op-1",
                "status": "Succeeded"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let status = client.wait_for_operation("op-1").await.unwrap();

        assert_eq!(status.status, OperationState::Succeeded);
    }

    #[tokio::test]
    async fn wait_for_operation_returns_failed_state_as_ok() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customvoice/operations/op-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "op-2",
                "status": "Failed"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let status = client.wait_for_operation("op-2").await.unwrap();

        assert_eq!(status.status, OperationState::Failed);
    }

    #[tokio::test]
    async fn wait_for_operation_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customvoice/operations/op-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "op-3",
                "status": "Running"
            })))
            .mount(&mock_server)
            .await;

        let config = AzureSpeechConfig {
            poll_timeout_ms: 20,
            poll_interval_ms: 5,
            ..AzureSpeechConfig::test(&mock_server.uri())
        };
        let client = CustomVoiceClient::new(config).unwrap();

        let err = client.wait_for_operation("op-3").await.unwrap_err();
        assert!(matches!(err, SpeechError::OperationTimedOut { .. }));
    }

    #[tokio::test]
    async fn unavailable_client_short_circuits() {
        let client = CustomVoiceClient::new(AzureSpeechConfig::default()).unwrap();

        assert!(!VoiceEnrollment::available(&client));
        assert!(matches!(
            client.create_project("p1", None, None).await,
            Err(SpeechError::NotAvailable(_))
        ));
    }
}
