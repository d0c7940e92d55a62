//! AI Speech - Azure Speech synthesis and Personal Voice enrollment
//!
//! Provides traits and implementations for the two speech-facing
//! capabilities of VoxStudio:
//! - `TextToSpeech` - synthesize SSML into audio and list catalog voices
//! - `VoiceEnrollment` - create a Personal Voice (project, consent, prompt
//!   audio) via the Custom Voice REST API
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains the Azure REST adapters
//!
//! Providers are constructed lazily with respect to credentials: building one
//! without a key or region succeeds but reports `available() == false`, and
//! capability methods return `SpeechError::NotAvailable` instead of touching
//! the network.

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod ssml;
pub mod types;

pub use config::{AzureSpeechConfig, SpeechCredentials};
pub use error::SpeechError;
pub use ports::{
    AzureVoice, ConsentReceipt, ConsentUpload, OperationState, OperationStatus,
    PersonalVoiceReceipt, PersonalVoiceUpload, TextToSpeech, VoiceEnrollment,
};
pub use providers::{AzureTtsProvider, CustomVoiceClient};
pub use types::{
    AudioData, AudioFormat, MAX_PROMPT_DURATION_MS, MIN_PROMPT_DURATION_MS, UploadedAudio,
};
