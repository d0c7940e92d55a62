//! Speech provider implementations
//!
//! Contains the Azure REST adapters for the `TextToSpeech` and
//! `VoiceEnrollment` traits.

pub mod azure_tts;
pub mod custom_voice;

pub use azure_tts::AzureTtsProvider;
pub use custom_voice::CustomVoiceClient;
