//! Azure Speech text-to-speech provider
//!
//! Implements `TextToSpeech` against the regional REST endpoint. Synthesis
//! posts SSML and receives RIFF PCM; the catalog comes from
//! `/cognitiveservices/voices/list`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::AzureSpeechConfig;
use crate::error::SpeechError;
use crate::ports::{AzureVoice, TextToSpeech};
use crate::types::{AudioData, AudioFormat};

/// Output format requested from the service; matches what the download
/// surface serves
pub const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

const USER_AGENT: &str = concat!("voxstudio/", env!("CARGO_PKG_VERSION"));

/// Azure Speech TTS provider
#[derive(Debug, Clone)]
pub struct AzureTtsProvider {
    client: Client,
    config: AzureSpeechConfig,
    available: bool,
}

impl AzureTtsProvider {
    /// Create a new provider.
    ///
    /// Missing credentials do not fail construction; the provider reports
    /// itself unavailable instead so the hosting surface can grey the option
    /// out.
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

    fn synthesis_url(&self) -> String {
        format!("{}/cognitiveservices/v1", self.config.tts_host())
    }

    fn voices_url(&self) -> String {
        format!("{}/cognitiveservices/voices/list", self.config.tts_host())
    }
}

#[async_trait]
impl TextToSpeech for AzureTtsProvider {
    #[instrument(skip(self, ssml), fields(ssml_len = ssml.len()))]
    async fn synthesize_ssml(&self, ssml: &str) -> Result<AudioData, SpeechError> {
        if !self.available {
            return Err(SpeechError::NotAvailable(
                "azure-speech-tts (missing key or region)".to_string(),
            ));
        }
        if ssml.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "SSML document is empty".to_string(),
            ));
        }

        debug!("Synthesizing SSML with Azure Speech");

        let request = self
            .client
            .post(self.synthesis_url())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", USER_AGENT)
            .body(ssml.to_string());

        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(SpeechError::RateLimited);
            }
            warn!(status = %status, "Azure TTS request rejected");
            return Err(SpeechError::SynthesisFailed(format!("HTTP {status}: {body}")));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        if audio_bytes.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Service returned an empty audio body".to_string(),
            ));
        }

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), AudioFormat::Wav))
    }

    async fn list_voices(&self) -> Result<Vec<AzureVoice>, SpeechError> {
        if !self.available {
            return Err(SpeechError::NotAvailable(
                "azure-speech-tts (missing key or region)".to_string(),
            ));
        }

        let request = self
            .client
            .get(self.voices_url())
            .header("User-Agent", USER_AGENT);
        let response = self.config.credentials.apply(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse voices: {e}")))
    }

    fn available(&self) -> bool {
        self.available
    }

    fn service_name(&self) -> &'static str {
        "azure-speech-tts"
    }
}
