//! Types for speech processing
//!
//! Audio containers, format sniffing, and the explicit uploaded-file value
//! struct handed to enrollment calls.

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Minimum accepted prompt audio duration (5 seconds)
pub const MIN_PROMPT_DURATION_MS: u64 = 5_000;

/// Maximum accepted prompt audio duration (90 seconds)
pub const MAX_PROMPT_DURATION_MS: u64 = 90_000;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV format (uncompressed)
    Wav,
    /// MP3 format
    Mp3,
    /// OGG container
    Ogg,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension for this audio format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Parse audio format from a MIME type
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let base_mime = mime.split(';').next().unwrap_or(mime).trim();
        match base_mime {
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// Sniff the format from leading magic bytes.
    ///
    /// Recognizes RIFF/WAVE, ID3-tagged or raw MP3 frames, and OggS
    /// containers. Unknown payloads fall back to WAV, which is what the
    /// consent/prompt recorders produce.
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
            return Self::Wav;
        }
        if data.len() >= 3 && (&data[0..3] == b"ID3" || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0))
        {
            return Self::Mp3;
        }
        if data.len() >= 4 && &data[0..4] == b"OggS" {
            return Self::Ogg;
        }
        Self::Wav
    }
}

/// Best-effort duration probe for RIFF/WAVE payloads.
///
/// Walks the chunk list for `fmt ` (byte rate) and `data` (payload length).
/// Returns `None` for non-WAV or truncated input.
#[must_use]
pub fn wav_duration_ms(data: &[u8]) -> Option<u64> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return None;
    }

    let mut byte_rate: Option<u32> = None;
    let mut data_len: Option<u32> = None;

    let mut offset = 12usize;
    while offset + 8 <= data.len() {
        let chunk_id = &data[offset..offset + 4];
        let size_bytes: [u8; 4] = data[offset + 4..offset + 8].try_into().ok()?;
        let size = u32::from_le_bytes(size_bytes);
        let body = offset + 8;

        if chunk_id == b"fmt " {
            if body + 12 <= data.len() {
                let rate_bytes: [u8; 4] = data[body + 8..body + 12].try_into().ok()?;
                byte_rate = Some(u32::from_le_bytes(rate_bytes));
            }
        } else if chunk_id == b"data" {
            data_len = Some(size);
        }

        if byte_rate.is_some() && data_len.is_some() {
            break;
        }

        // Chunks are word-aligned
        let padding = usize::from(size % 2 != 0);
        let advance = usize::try_from(size).ok()?.checked_add(padding)?;
        offset = body.checked_add(advance)?;
    }

    let rate = byte_rate?;
    let len = data_len?;
    if rate == 0 {
        return None;
    }
    Some(u64::from(len) * 1000 / u64::from(rate))
}

/// Container for audio data with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Raw audio bytes
    data: Vec<u8>,
    /// Audio format
    format: AudioFormat,
    /// Duration in milliseconds (if known)
    duration_ms: Option<u64>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            duration_ms: None,
        }
    }

    /// Create audio data with a known duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the duration in milliseconds (if known)
    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the MIME type for this audio
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Generate a filename with the appropriate extension
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }
}

/// An uploaded audio file, passed by value.
///
/// Replaces duck-typed "anything with a name and readable bytes" upload
/// handles with an explicit struct.
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    /// Original filename as supplied by the client
    pub filename: String,
    /// File content
    pub content: Vec<u8>,
    /// Declared content type (may be empty; the magic bytes win then)
    pub content_type: String,
}

impl UploadedAudio {
    /// Create a new uploaded audio value
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content,
            content_type: content_type.into(),
        }
    }

    /// Resolve the audio format from the declared content type, falling back
    /// to magic-byte sniffing.
    #[must_use]
    pub fn format(&self) -> AudioFormat {
        AudioFormat::from_mime_type(&self.content_type)
            .unwrap_or_else(|| AudioFormat::detect(&self.content))
    }

    /// Effective MIME type sent to the cloud API
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format().mime_type()
    }

    /// Duration in milliseconds, when the container makes it cheap to probe
    /// (WAV only).
    #[must_use]
    pub fn duration_ms(&self) -> Option<u64> {
        wav_duration_ms(&self.content)
    }

    /// Check if the upload has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Reject prompt audio whose probeable duration falls outside the
    /// 5-90 second window. Unknown durations pass; the cloud validates those.
    pub fn validate_prompt_duration(&self) -> Result<(), SpeechError> {
        if let Some(duration_ms) = self.duration_ms() {
            if !(MIN_PROMPT_DURATION_MS..=MAX_PROMPT_DURATION_MS).contains(&duration_ms) {
                return Err(SpeechError::AudioDurationOutOfRange {
                    duration_ms,
                    min_ms: MIN_PROMPT_DURATION_MS,
                    max_ms: MAX_PROMPT_DURATION_MS,
                });
            }
        }
        Ok(())
    }
}
