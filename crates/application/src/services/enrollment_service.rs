//! Personal Voice enrollment flow
//!
//! Drives project creation, consent upload, and personal-voice creation in
//! order, waits for the resulting operation, then records the new speaker
//! profile in the configuration and persists it.

use std::sync::Arc;
use std::time::Instant;

use ai_speech::{
    ConsentUpload, OperationState, PersonalVoiceUpload, SpeechError, UploadedAudio,
    VoiceEnrollment,
};
use domain::{DomainError, PersonalVoiceConfig, SpeakerProfile};
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::ConfigRepository;

/// Everything the enrollment flow needs from the user
#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    /// Custom Voice project id
    pub project_id: String,
    /// Consent resource id
    pub consent_id: String,
    /// Personal voice resource id
    pub personal_voice_id: String,
    /// Locale of the consent statement (BCP-47)
    pub consent_locale: String,
    /// Name spoken in the consent audio
    pub voice_talent_name: String,
    /// Company name spoken in the consent audio
    pub company_name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Recorded verbal consent statement
    pub consent_audio: UploadedAudio,
    /// Clean prompt audio from the same speaker (5-90s each)
    pub prompt_audio: Vec<UploadedAudio>,
}

/// Result of a completed enrollment
#[derive(Debug)]
pub struct EnrollmentOutcome {
    /// Cloud-assigned speaker profile id
    pub speaker_profile_id: String,
    /// Locally registered profile (already selected)
    pub profile: SpeakerProfile,
    /// Operation id of the personal-voice creation, when reported
    pub operation_id: Option<String>,
    /// Wall-clock time spent on the cloud calls
    pub processing_time_ms: u64,
    /// Updated configuration, already persisted
    pub config: PersonalVoiceConfig,
}

/// Orchestrates the Custom Voice enrollment flow
pub struct EnrollmentService {
    enrollment: Arc<dyn VoiceEnrollment>,
    repository: Arc<dyn ConfigRepository>,
}

impl std::fmt::Debug for EnrollmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentService").finish_non_exhaustive()
    }
}

fn require_fields(request: &EnrollmentRequest) -> Result<(), DomainError> {
    let required = [
        ("project_id", request.project_id.as_str()),
        ("consent_id", request.consent_id.as_str()),
        ("personal_voice_id", request.personal_voice_id.as_str()),
        ("consent_locale", request.consent_locale.as_str()),
        ("voice_talent_name", request.voice_talent_name.as_str()),
        ("company_name", request.company_name.as_str()),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(DomainError::validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }
    if request.consent_audio.is_empty() {
        return Err(DomainError::validation("consent audio file is required"));
    }
    if request.prompt_audio.is_empty() {
        return Err(DomainError::validation(
            "at least one prompt audio file is required",
        ));
    }
    Ok(())
}

impl EnrollmentService {
    /// Create a new enrollment service
    pub fn new(enrollment: Arc<dyn VoiceEnrollment>, repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            enrollment,
            repository,
        }
    }

    /// Run the full enrollment flow against a snapshot of the configuration.
    ///
    /// All user input is validated before any network call. On success the
    /// new speaker profile is added (and selected) and the updated
    /// configuration is persisted.
    #[instrument(skip(self, config, request), fields(personal_voice_id = %request.personal_voice_id))]
    pub async fn enroll(
        &self,
        mut config: PersonalVoiceConfig,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentOutcome, ApplicationError> {
        require_fields(&request)?;
        for prompt in &request.prompt_audio {
            prompt.validate_prompt_duration()?;
        }
        if config
            .speech_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
            || config.speech_region.trim().is_empty()
        {
            return Err(DomainError::validation("missing Speech key or region").into());
        }

        // Record the enrollment inputs so a partially failed run can be
        // retried with the same ids.
        config.project_id = request.project_id.clone();
        config.consent_id = request.consent_id.clone();
        config.personal_voice_id = request.personal_voice_id.clone();
        config.consent_locale = request.consent_locale.clone();
        config.voice_talent_name = request.voice_talent_name.clone();
        config.company_name = request.company_name.clone();

        let started = Instant::now();

        self.enrollment
            .create_project(&request.project_id, None, request.description.as_deref())
            .await?;

        let consent = self
            .enrollment
            .upload_consent(&ConsentUpload {
                consent_id: request.consent_id.clone(),
                project_id: request.project_id.clone(),
                voice_talent_name: request.voice_talent_name.clone(),
                company_name: request.company_name.clone(),
                locale: request.consent_locale.clone(),
                description: request.description.clone(),
                audio: request.consent_audio.clone(),
            })
            .await?;
        if consent.reused_existing {
            info!(consent_id = %request.consent_id, "reusing existing consent resource");
        }

        let receipt = self
            .enrollment
            .create_personal_voice(&PersonalVoiceUpload {
                personal_voice_id: request.personal_voice_id.clone(),
                project_id: request.project_id.clone(),
                consent_id: request.consent_id.clone(),
                description: request.description.clone(),
                prompts: request.prompt_audio.clone(),
            })
            .await?;

        if let Some(operation_id) = receipt.operation_id.as_deref() {
            let status = self.enrollment.wait_for_operation(operation_id).await?;
            if status.status == OperationState::Failed {
                return Err(SpeechError::enrollment(
                    "operation",
                    format!("operation {operation_id} finished as Failed"),
                )
                .into());
            }
        }

        let speaker_profile_id = match receipt.speaker_profile_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                // Some API versions only attach the profile id once the
                // operation has finished; re-fetch the resource then.
                let fetched = self
                    .enrollment
                    .personal_voice(&request.personal_voice_id)
                    .await?;
                fetched.speaker_profile_id.ok_or_else(|| {
                    SpeechError::InvalidResponse(
                        "personal voice resource carries no speakerProfileId".to_string(),
                    )
                })?
            },
        };

        let processing_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let profile_name = if request.voice_talent_name.trim().is_empty() {
            format!("Profile {}", request.personal_voice_id)
        } else {
            request.voice_talent_name.clone()
        };
        let profile = config.add_profile(&profile_name, &speaker_profile_id);
        self.repository.save(&config)?;

        info!(
            profile_id = %profile.id,
            speaker_profile_id = %speaker_profile_id,
            "personal voice enrolled"
        );

        Ok(EnrollmentOutcome {
            speaker_profile_id,
            profile,
            operation_id: receipt.operation_id,
            processing_time_ms,
            config,
        })
    }
}
