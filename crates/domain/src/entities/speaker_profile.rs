//! Speaker profile entity
//!
//! Wraps a cloud-issued speaker profile id with local metadata.

use serde::{Deserialize, Serialize};

/// A locally tracked Personal Voice speaker profile.
///
/// The cloud only hands back an opaque `speaker_profile_id`; the surrounding
/// fields give it a stable local identity and a human-readable label.
/// Immutable once created except for rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    /// Local identifier, unique within a config (`profile_<YYYY_MM_DD>_<n>`)
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// Cloud-assigned speaker profile GUID used in synthesis SSML
    pub speaker_profile_id: String,
    /// ISO date (YYYY-MM-DD) the profile was created locally
    pub creation_date: String,
}

impl SpeakerProfile {
    /// Display label used by profile pickers: `"<name> (<creation_date>)"`
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.creation_date)
    }
}
