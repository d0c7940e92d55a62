//! Text synthesis with the selected Personal Voice profile
//!
//! Validates the configuration, builds the SSML, calls the TTS port, and
//! optionally persists the WAV under the configured output directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ai_speech::ssml::{self, Prosody};
use ai_speech::{AudioData, TextToSpeech};
use domain::{DomainError, PersonalVoiceConfig};
use tracing::{info, instrument};

use crate::error::ApplicationError;

/// A synthesis request from the user
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,
    /// Where to persist the WAV; `None` keeps it in memory only
    pub output_path: Option<PathBuf>,
}

/// Result of a synthesis call
#[derive(Debug)]
pub struct SynthesisOutcome {
    /// Synthesized audio
    pub audio: AudioData,
    /// Path the audio was written to, when requested
    pub output_path: Option<PathBuf>,
    /// Wall-clock time spent in the external call
    pub processing_time_ms: u64,
}

/// Synthesis orchestration over a `TextToSpeech` port
pub struct SynthesisService {
    tts: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for SynthesisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisService").finish_non_exhaustive()
    }
}

impl SynthesisService {
    /// Create a new synthesis service
    pub fn new(tts: Arc<dyn TextToSpeech>) -> Self {
        Self { tts }
    }

    /// Whether the underlying provider has credentials
    #[must_use]
    pub fn available(&self) -> bool {
        self.tts.available()
    }

    async fn run(&self, markup: &str, output_path: Option<PathBuf>) -> Result<SynthesisOutcome, ApplicationError> {
        let started = Instant::now();
        let audio = self.tts.synthesize_ssml(markup).await?;
        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Some(path) = &output_path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, audio.data()).await?;
            info!(path = %path.display(), bytes = audio.size_bytes(), "synthesis output written");
        }

        Ok(SynthesisOutcome {
            audio,
            output_path,
            processing_time_ms,
        })
    }

    /// Synthesize text with the currently selected Personal Voice profile.
    #[instrument(skip(self, config, request), fields(text_len = request.text.len()))]
    pub async fn synthesize_personal_voice(
        &self,
        config: &PersonalVoiceConfig,
        request: &SynthesisRequest,
    ) -> Result<SynthesisOutcome, ApplicationError> {
        config.validate_for_synthesis()?;
        if request.text.trim().is_empty() {
            return Err(DomainError::validation("text is empty").into());
        }
        let profile = config
            .selected_profile()
            .ok_or_else(|| DomainError::validation("no speaker profile selected"))?;

        let markup = ssml::personal_voice_ssml(
            &request.text,
            &profile.speaker_profile_id,
            &config.voice_name,
            &config.language,
        );

        self.run(&markup, request.output_path.clone()).await
    }

    /// Synthesize a catalog voice preview with prosody controls.
    #[instrument(skip(self, text), fields(voice = %voice_name, text_len = text.len()))]
    pub async fn preview_catalog_voice(
        &self,
        voice_name: &str,
        locale: &str,
        text: &str,
        prosody: &Prosody,
    ) -> Result<SynthesisOutcome, ApplicationError> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("text is empty").into());
        }
        if voice_name.trim().is_empty() {
            return Err(DomainError::validation("voice name is required").into());
        }

        let markup = ssml::prosody_ssml(voice_name, locale, text, prosody);
        self.run(&markup, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_speech::{AudioFormat, AzureVoice, SpeechError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockTts {
        available: bool,
        last_ssml: Mutex<Option<String>>,
    }

    impl MockTts {
        fn new() -> Self {
            Self {
                available: true,
                last_ssml: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextToSpeech for MockTts {
        async fn synthesize_ssml(&self, markup: &str) -> Result<AudioData, SpeechError> {
            if !self.available {
                return Err(SpeechError::NotAvailable("mock".to_string()));
            }
            *self.last_ssml.lock().unwrap() = Some(markup.to_string());
            Ok(AudioData::new(vec![1, 2, 3, 4], AudioFormat::Wav))
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

    fn synthesis_ready_config() -> PersonalVoiceConfig {
        let mut config = PersonalVoiceConfig {
            speech_key: Some("key".to_string()),
            speech_region: "eastus".to_string(),
            ..PersonalVoiceConfig::default()
        };
        config.add_profile("Alice", "guid-1");
        config
    }

    #[tokio::test]
    async fn synthesize_builds_personal_voice_ssml() {
        let tts = Arc::new(MockTts::new());
        let service = SynthesisService::new(Arc::clone(&tts) as Arc<dyn TextToSpeech>);
        let config = synthesis_ready_config();

        let outcome = service
            .synthesize_personal_voice(
                &config,
                &SynthesisRequest {
                    text: "Hello there".to_string(),
                    output_path: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.audio.size_bytes(), 4);
        let markup = tts.last_ssml.lock().unwrap().clone().unwrap();
        assert!(markup.contains("speakerProfileId='guid-1'"));
        assert!(markup.contains("Hello there"));
    }

    #[tokio::test]
    async fn synthesize_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("personal_voice_output.wav");

        let service = SynthesisService::new(Arc::new(MockTts::new()));
        let outcome = service
            .synthesize_personal_voice(
                &synthesis_ready_config(),
                &SynthesisRequest {
                    text: "Hello".to_string(),
                    output_path: Some(output.clone()),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.output_path.as_deref(), Some(output.as_path()));
        assert_eq!(std::fs::read(&output).unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn incomplete_config_fails_validation() {
        let service = SynthesisService::new(Arc::new(MockTts::new()));
        let err = service
            .synthesize_personal_voice(
                &PersonalVoiceConfig::default(),
                &SynthesisRequest {
                    text: "Hello".to_string(),
                    output_path: None,
                },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("missing required config values"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let service = SynthesisService::new(Arc::new(MockTts::new()));
        let err = service
            .synthesize_personal_voice(
                &synthesis_ready_config(),
                &SynthesisRequest {
                    text: "   ".to_string(),
                    output_path: None,
                },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("text is empty"));
    }

    #[tokio::test]
    async fn preview_uses_prosody_markup() {
        let tts = Arc::new(MockTts::new());
        let service = SynthesisService::new(Arc::clone(&tts) as Arc<dyn TextToSpeech>);

        service
            .preview_catalog_voice(
                "en-US-AvaNeural",
                "en-US",
                "Preview me",
                &Prosody {
                    rate: 1.5,
                    pitch: 1.0,
                    volume: 1.0,
                },
            )
            .await
            .unwrap();

        let markup = tts.last_ssml.lock().unwrap().clone().unwrap();
        assert!(markup.contains("<prosody rate='+50%'"));
        assert!(markup.contains("en-US-AvaNeural"));
    }

    #[tokio::test]
    async fn unavailable_provider_error_passes_through() {
        let service = SynthesisService::new(Arc::new(MockTts {
            available: false,
            last_ssml: Mutex::new(None),
        }));

        let err = service
            .preview_catalog_voice("v", "en-US", "hi", &Prosody::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Speech(SpeechError::NotAvailable(_))
        ));
    }
}
