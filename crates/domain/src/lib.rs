//! Domain layer for VoxStudio
//!
//! Contains the Personal Voice configuration aggregate and the speaker-profile
//! registry. This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;

pub use entities::{DEFAULT_CUSTOM_VOICE_API_VERSION, PersonalVoiceConfig, SpeakerProfile};
pub use errors::DomainError;
