//! Personal Voice configuration aggregate
//!
//! `PersonalVoiceConfig` owns the speaker-profile registry. Profiles are kept
//! in insertion order, ids are unique by construction of the generation
//! scheme, and a dangling selection resolves to no profile rather than an
//! error.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

use super::SpeakerProfile;

/// Custom Voice REST API version used for Personal Voice enrollment.
pub const DEFAULT_CUSTOM_VOICE_API_VERSION: &str = "2024-02-01-preview";

fn default_voice_name() -> String {
    "DragonLatestNeural".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_api_version() -> String {
    DEFAULT_CUSTOM_VOICE_API_VERSION.to_string()
}

/// Configuration required to enroll and synthesize with Personal Voice.
///
/// `voice_name` is the base model voice used in SSML (e.g.
/// `DragonLatestNeural`); the cloud applies the Personal Voice embedding via
/// the selected profile's `speaker_profile_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalVoiceConfig {
    /// Azure Speech subscription key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_key: Option<String>,

    /// Azure Speech resource region (e.g. "eastus")
    #[serde(default)]
    pub speech_region: String,

    /// Base model voice name used in SSML `<voice name='...'>`
    #[serde(default = "default_voice_name")]
    pub voice_name: String,

    /// SSML language (`xml:lang`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Speaker profiles, in insertion order (oldest first)
    #[serde(default)]
    pub profiles: Vec<SpeakerProfile>,

    /// Id of the currently selected profile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_profile_id: Option<String>,

    /// Custom Voice REST API version for enrollment calls
    #[serde(default = "default_api_version")]
    pub custom_voice_api_version: String,

    /// Custom Voice project id used by the last enrollment
    #[serde(default)]
    pub project_id: String,

    /// Consent resource id used by the last enrollment
    #[serde(default)]
    pub consent_id: String,

    /// Personal voice resource id used by the last enrollment
    #[serde(default)]
    pub personal_voice_id: String,

    /// Locale of the consent statement audio (BCP-47)
    #[serde(default = "default_language")]
    pub consent_locale: String,

    /// Name spoken in the consent audio
    #[serde(default)]
    pub voice_talent_name: String,

    /// Company name spoken in the consent audio
    #[serde(default)]
    pub company_name: String,
}

impl Default for PersonalVoiceConfig {
    fn default() -> Self {
        Self {
            speech_key: None,
            speech_region: String::new(),
            voice_name: default_voice_name(),
            language: default_language(),
            profiles: Vec::new(),
            selected_profile_id: None,
            custom_voice_api_version: default_api_version(),
            project_id: String::new(),
            consent_id: String::new(),
            personal_voice_id: String::new(),
            consent_locale: default_language(),
            voice_talent_name: String::new(),
            company_name: String::new(),
        }
    }
}

impl PersonalVoiceConfig {
    /// Add a new speaker profile dated today and select it.
    ///
    /// Returns the created record.
    pub fn add_profile(&mut self, name: &str, speaker_profile_id: &str) -> SpeakerProfile {
        self.add_profile_on(Utc::now().date_naive(), name, speaker_profile_id)
    }

    /// Date-injected variant backing [`Self::add_profile`].
    ///
    /// Ids are generated as `profile_<YYYY_MM_DD>_<n>` where `n` is the
    /// smallest positive integer not already used for that date, so ids stay
    /// unique even after removals. A blank name falls back to
    /// `Profile <date>`.
    pub fn add_profile_on(
        &mut self,
        date: NaiveDate,
        name: &str,
        speaker_profile_id: &str,
    ) -> SpeakerProfile {
        let id = self.next_profile_id(date);
        let name = if name.trim().is_empty() {
            format!("Profile {}", date.format("%Y-%m-%d"))
        } else {
            name.trim().to_string()
        };

        let profile = SpeakerProfile {
            id: id.clone(),
            name,
            speaker_profile_id: speaker_profile_id.to_string(),
            creation_date: date.format("%Y-%m-%d").to_string(),
        };
        self.profiles.push(profile.clone());
        // Auto-select the newly created profile
        self.selected_profile_id = Some(id);
        profile
    }

    /// Smallest unused id for `date`, of the form `profile_<YYYY_MM_DD>_<n>`.
    #[must_use]
    pub fn next_profile_id(&self, date: NaiveDate) -> String {
        let prefix = format!("profile_{}_", date.format("%Y_%m_%d"));
        let used: HashSet<u32> = self
            .profiles
            .iter()
            .filter_map(|p| p.id.strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse().ok())
            .collect();

        let mut n = 1u32;
        while used.contains(&n) {
            n += 1;
        }
        format!("{prefix}{n}")
    }

    /// The currently selected speaker profile.
    ///
    /// An unset or dangling selection yields `None`, never an error.
    #[must_use]
    pub fn selected_profile(&self) -> Option<&SpeakerProfile> {
        let id = self.selected_profile_id.as_deref()?;
        self.profiles.iter().find(|p| p.id == id)
    }

    /// `(display_label, id)` pairs for UI selection, in insertion order.
    #[must_use]
    pub fn profile_choices(&self) -> Vec<(String, String)> {
        self.profiles
            .iter()
            .map(|p| (p.display_label(), p.id.clone()))
            .collect()
    }

    /// Select an existing profile by id.
    pub fn select_profile(&mut self, id: &str) -> Result<(), DomainError> {
        if self.profiles.iter().any(|p| p.id == id) {
            self.selected_profile_id = Some(id.to_string());
            Ok(())
        } else {
            Err(DomainError::not_found("SpeakerProfile", id))
        }
    }

    /// Rename an existing profile.
    pub fn rename_profile(&mut self, id: &str, name: &str) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("profile name must not be empty"));
        }
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("SpeakerProfile", id))?;
        profile.name = name.to_string();
        Ok(())
    }

    /// Remove a profile by id, returning the removed record.
    ///
    /// Removing the selected profile clears the selection.
    pub fn remove_profile(&mut self, id: &str) -> Result<SpeakerProfile, DomainError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("SpeakerProfile", id))?;
        let removed = self.profiles.remove(index);
        if self.selected_profile_id.as_deref() == Some(id) {
            self.selected_profile_id = None;
        }
        Ok(removed)
    }

    /// Check that everything synthesis needs is present.
    ///
    /// Collects every missing field into one message so the user can fix the
    /// configuration in a single pass.
    pub fn validate_for_synthesis(&self) -> Result<(), DomainError> {
        let mut missing = Vec::new();
        if self
            .speech_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
        {
            missing.push("speech_key".to_string());
        }
        if self.speech_region.trim().is_empty() {
            missing.push("speech_region".to_string());
        }
        match self.selected_profile_id.as_deref() {
            None | Some("") => missing.push("selected_profile_id (no profile selected)".to_string()),
            Some(_) if self.selected_profile().is_none() => {
                missing.push("selected_profile_id (profile not found)".to_string());
            },
            Some(_) => {},
        }
        if self.voice_name.trim().is_empty() {
            missing.push("voice_name".to_string());
        }
        if self.language.trim().is_empty() {
            missing.push("language".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "missing required config values: {}",
                missing.join(", ")
            )))
        }
    }
}
