//! Application state shared across handlers

use std::sync::Arc;

use ai_speech::{AzureTtsProvider, CustomVoiceClient, SpeechError};
use application::{
    ConfigRepository, EnrollmentService, ExtractionService, SynthesisService, VoiceCatalog,
};
use domain::{DomainError, PersonalVoiceConfig};
use infrastructure::AppConfig;
use parking_lot::RwLock;

use crate::error::ApiError;

/// Shared application state
///
/// The persisted Personal Voice configuration lives behind one lock; every
/// mutation goes through [`AppState::update_config`], which persists first
/// and only then publishes the new value.
#[derive(Clone)]
pub struct AppState {
    /// Server settings (immutable for the process lifetime)
    pub settings: Arc<AppConfig>,
    /// Live Personal Voice configuration
    pub config: Arc<RwLock<PersonalVoiceConfig>>,
    /// Persistence for the Personal Voice configuration
    pub repository: Arc<dyn ConfigRepository>,
    /// Curated voice gallery
    pub catalog: Arc<VoiceCatalog>,
    /// Document extraction comparison service
    pub extraction: Arc<ExtractionService>,
}

impl AppState {
    /// Clone of the current configuration
    #[must_use]
    pub fn snapshot(&self) -> PersonalVoiceConfig {
        self.config.read().clone()
    }

    /// Replace the live configuration (used after flows that persist
    /// themselves, e.g. enrollment)
    pub fn publish(&self, config: PersonalVoiceConfig) {
        *self.config.write() = config;
    }

    /// Apply a mutation, persist it, then publish it.
    ///
    /// The draft is only published when the save succeeded, so the live
    /// config never diverges from disk.
    pub fn update_config<T>(
        &self,
        mutate: impl FnOnce(&mut PersonalVoiceConfig) -> Result<T, DomainError>,
    ) -> Result<T, ApiError> {
        let mut guard = self.config.write();
        let mut draft = guard.clone();
        let out = mutate(&mut draft)?;
        self.repository.save(&draft)?;
        *guard = draft;
        Ok(out)
    }

    /// Build a synthesis service from the live credentials.
    ///
    /// Rebuilt per request so a credential change via `PUT /v1/config` takes
    /// effect immediately.
    pub fn synthesis_service(&self) -> Result<SynthesisService, SpeechError> {
        let speech_config = self.settings.speech_config(&self.snapshot());
        let provider = AzureTtsProvider::new(speech_config)?;
        Ok(SynthesisService::new(Arc::new(provider)))
    }

    /// Build an enrollment service from the live credentials.
    pub fn enrollment_service(&self) -> Result<EnrollmentService, SpeechError> {
        let speech_config = self.settings.speech_config(&self.snapshot());
        let client = CustomVoiceClient::new(speech_config)?;
        Ok(EnrollmentService::new(
            Arc::new(client),
            Arc::clone(&self.repository),
        ))
    }

    /// Whether the speech integration currently has credentials
    #[must_use]
    pub fn speech_available(&self) -> bool {
        self.settings.speech_config(&self.snapshot()).is_configured()
    }
}
