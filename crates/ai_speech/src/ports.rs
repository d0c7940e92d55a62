//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech adapters must implement, plus the
//! value types exchanged over them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;
use crate::types::{AudioData, UploadedAudio};

/// An entry from the Azure voice catalog (`/cognitiveservices/voices/list`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureVoice {
    /// Full voice resource name
    #[serde(rename = "Name")]
    pub name: String,
    /// Short name used in SSML `<voice name='...'>`
    #[serde(rename = "ShortName")]
    pub short_name: String,
    /// Voice gender as reported by the service
    #[serde(rename = "Gender", default)]
    pub gender: String,
    /// BCP-47 locale
    #[serde(rename = "Locale", default)]
    pub locale: String,
    /// Voice type (e.g. "Neural")
    #[serde(rename = "VoiceType", default)]
    pub voice_type: String,
}

/// Consent audio upload for Personal Voice enrollment
#[derive(Debug, Clone)]
pub struct ConsentUpload {
    /// Consent resource id (user-chosen)
    pub consent_id: String,
    /// Owning Custom Voice project id
    pub project_id: String,
    /// Name spoken in the consent statement
    pub voice_talent_name: String,
    /// Company name spoken in the consent statement
    pub company_name: String,
    /// Locale of the consent statement (BCP-47)
    pub locale: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// The recorded consent statement
    pub audio: UploadedAudio,
}

/// Prompt audio upload creating the Personal Voice itself
#[derive(Debug, Clone)]
pub struct PersonalVoiceUpload {
    /// Personal voice resource id (user-chosen; the speaker profile id is
    /// generated by the service)
    pub personal_voice_id: String,
    /// Owning Custom Voice project id
    pub project_id: String,
    /// Consent resource id
    pub consent_id: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Clean prompt audio from the consenting speaker
    pub prompts: Vec<UploadedAudio>,
}

/// Outcome of a consent upload
#[derive(Debug, Clone, Serialize)]
pub struct ConsentReceipt {
    /// Raw consent resource returned by the service
    pub body: serde_json::Value,
    /// Async operation id, when the service reported one
    pub operation_id: Option<String>,
    /// True when a 409 was resolved by reusing the existing consent
    pub reused_existing: bool,
}

/// Outcome of a personal-voice create or fetch
#[derive(Debug, Clone, Serialize)]
pub struct PersonalVoiceReceipt {
    /// Raw personal-voice resource returned by the service
    pub body: serde_json::Value,
    /// Cloud-assigned speaker profile id, once present
    pub speaker_profile_id: Option<String>,
    /// Async operation id, when the service reported one
    pub operation_id: Option<String>,
}

/// Terminal and non-terminal states of a Custom Voice operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    /// Queued, not yet started
    NotStarted,
    /// In progress
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished with an error
    Failed,
}

impl OperationState {
    /// Parse the service's status string; unknown values map to `NotStarted`
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::NotStarted,
        }
    }

    /// Whether polling can stop
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Status snapshot of a Custom Voice operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatus {
    /// Operation id
    pub id: String,
    /// Current state
    pub status: OperationState,
}

/// Port for text-to-speech implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::{TextToSpeech, ssml};
///
/// async fn speak(tts: &impl TextToSpeech, text: &str) -> Result<Vec<u8>, ai_speech::SpeechError> {
///     let markup = ssml::personal_voice_ssml(text, "profile-guid", "DragonLatestNeural", "en-US");
///     Ok(tts.synthesize_ssml(&markup).await?.into_data())
/// }
/// ```
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize an SSML document into audio
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the provider is unavailable or the service
    /// rejects the request.
    async fn synthesize_ssml(&self, ssml: &str) -> Result<AudioData, SpeechError>;

    /// List the voices offered by the service
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if listing fails.
    async fn list_voices(&self) -> Result<Vec<AzureVoice>, SpeechError>;

    /// Whether credentials were present at construction time
    fn available(&self) -> bool;

    /// Stable service identifier used in result reports
    fn service_name(&self) -> &'static str;
}

/// Port for Personal Voice enrollment implementations
#[async_trait]
pub trait VoiceEnrollment: Send + Sync {
    /// Create (or update) a Custom Voice project of kind `PersonalVoice`
    async fn create_project(
        &self,
        project_id: &str,
        display_name: Option<&str>,
        description: Option<&str>,
    ) -> Result<serde_json::Value, SpeechError>;

    /// Upload the consent statement audio
    async fn upload_consent(&self, upload: &ConsentUpload) -> Result<ConsentReceipt, SpeechError>;

    /// Create the personal voice from prompt audio
    async fn create_personal_voice(
        &self,
        upload: &PersonalVoiceUpload,
    ) -> Result<PersonalVoiceReceipt, SpeechError>;

    /// Fetch the status of an async operation
    async fn operation(&self, operation_id: &str) -> Result<OperationStatus, SpeechError>;

    /// Poll an operation until it reaches a terminal state
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::OperationTimedOut` when the configured deadline
    /// passes first. A `Failed` terminal state is returned as `Ok`; mapping
    /// it to an error is the caller's decision.
    async fn wait_for_operation(&self, operation_id: &str)
    -> Result<OperationStatus, SpeechError>;

    /// Fetch a personal-voice resource (carries the speaker profile id once
    /// the operation has succeeded)
    async fn personal_voice(
        &self,
        personal_voice_id: &str,
    ) -> Result<PersonalVoiceReceipt, SpeechError>;

    /// Whether credentials were present at construction time
    fn available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTts {
        available: bool,
    }

    #[async_trait]
    impl TextToSpeech for MockTts {
        async fn synthesize_ssml(&self, _ssml: &str) -> Result<AudioData, SpeechError> {
            if self.available {
                Ok(AudioData::new(vec![0, 1, 2], crate::types::AudioFormat::Wav))
            } else {
                Err(SpeechError::NotAvailable("mock".to_string()))
            }
        }

        async fn list_voices(&self) -> Result<Vec<AzureVoice>, SpeechError> {
            Ok(Vec::new())
        }

        fn available(&self) -> bool {
            self.available
        }

        fn service_name(&self) -> &'static str {
            "mock-tts"
        }
    }

    #[tokio::test]
    async fn mock_tts_synthesizes_when_available() {
        let tts = MockTts { available: true };
        let audio = tts.synthesize_ssml("<speak/>").await.unwrap();
        assert!(!audio.is_empty());
    }

    #[tokio::test]
    async fn mock_tts_reports_unavailable() {
        let tts = MockTts { available: false };
        assert!(!tts.available());
        assert!(matches!(
            tts.synthesize_ssml("<speak/>").await,
            Err(SpeechError::NotAvailable(_))
        ));
    }

    #[test]
    fn operation_state_parsing() {
        assert_eq!(OperationState::parse("Running"), OperationState::Running);
        assert_eq!(OperationState::parse("Succeeded"), OperationState::Succeeded);
        assert_eq!(OperationState::parse("Failed"), OperationState::Failed);
        assert_eq!(OperationState::parse("whatever"), OperationState::NotStarted);
    }

    #[test]
    fn terminal_states() {
        assert!(OperationState::Succeeded.is_terminal());
        assert!(OperationState::Failed.is_terminal());
        assert!(!OperationState::Running.is_terminal());
        assert!(!OperationState::NotStarted.is_terminal());
    }

    #[test]
    fn azure_voice_deserializes_from_catalog_shape() {
        let json = serde_json::json!({
            "Name": "Microsoft Server Speech Text to Speech Voice (en-US, AvaNeural)",
            "ShortName": "en-US-AvaNeural",
            "Gender": "Female",
            "Locale": "en-US",
            "VoiceType": "Neural"
        });

        let voice: AzureVoice = serde_json::from_value(json).unwrap();
        assert_eq!(voice.short_name, "en-US-AvaNeural");
        assert_eq!(voice.gender, "Female");
    }
}
