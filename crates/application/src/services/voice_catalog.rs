//! Local voice gallery catalog
//!
//! Loads the curated voice list from a JSON file and supports the filter
//! surface of the gallery page: free-text search plus locale / gender /
//! age-group facets.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One gallery entry; field names match the curated JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogVoice {
    /// Voice name used in SSML `<voice name='...'>`
    #[serde(rename = "Voice Name")]
    pub voice_name: String,
    /// BCP-47 locale
    #[serde(rename = "Locale")]
    pub locale: String,
    /// Voice gender label
    #[serde(rename = "Gender")]
    pub gender: String,
    /// Age group label
    #[serde(rename = "Age Group")]
    pub age_group: String,
    /// Free-text description
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// Filter parameters for the gallery
#[derive(Debug, Clone, Default)]
pub struct VoiceFilter {
    /// Case-insensitive search over name and description
    pub search: Option<String>,
    /// Keep only these locales (empty keeps all)
    pub locales: Vec<String>,
    /// Keep only these genders (empty keeps all)
    pub genders: Vec<String>,
    /// Keep only these age groups (empty keeps all)
    pub age_groups: Vec<String>,
}

/// In-memory voice catalog
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<CatalogVoice>,
}

fn sorted_unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.collect();
    out.sort();
    out.dedup();
    out
}

impl VoiceCatalog {
    /// Build a catalog from in-memory entries
    #[must_use]
    pub fn from_voices(voices: Vec<CatalogVoice>) -> Self {
        Self { voices }
    }

    /// Load the catalog from a JSON file.
    ///
    /// A missing or malformed file logs and yields an empty catalog; the
    /// gallery page degrades instead of failing the server.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "voice catalog file not readable");
                return Self::default();
            },
        };

        match serde_json::from_str::<Vec<CatalogVoice>>(&text) {
            Ok(voices) => {
                info!(path = %path.display(), count = voices.len(), "voice catalog loaded");
                Self { voices }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "voice catalog file is not a JSON list");
                Self::default()
            },
        }
    }

    /// All voices, in file order
    #[must_use]
    pub fn voices(&self) -> &[CatalogVoice] {
        &self.voices
    }

    /// Number of voices
    #[must_use]
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Find a voice by its SSML name
    #[must_use]
    pub fn find(&self, voice_name: &str) -> Option<&CatalogVoice> {
        self.voices.iter().find(|v| v.voice_name == voice_name)
    }

    /// Apply the gallery filters
    #[must_use]
    pub fn filter(&self, filter: &VoiceFilter) -> Vec<&CatalogVoice> {
        let search = filter
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|q| !q.is_empty());

        self.voices
            .iter()
            .filter(|voice| {
                if let Some(query) = &search {
                    let haystack = format!(
                        "{} {}",
                        voice.voice_name.to_lowercase(),
                        voice.description.to_lowercase()
                    );
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if !filter.locales.is_empty() && !filter.locales.contains(&voice.locale) {
                    return false;
                }
                if !filter.genders.is_empty() && !filter.genders.contains(&voice.gender) {
                    return false;
                }
                if !filter.age_groups.is_empty() && !filter.age_groups.contains(&voice.age_group) {
                    return false;
                }
                true
            })
            .collect()
    }

    /// Sorted unique locales for the facet UI
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        sorted_unique(self.voices.iter().map(|v| v.locale.clone()))
    }

    /// Sorted unique genders for the facet UI
    #[must_use]
    pub fn genders(&self) -> Vec<String> {
        sorted_unique(self.voices.iter().map(|v| v.gender.clone()))
    }

    /// Sorted unique age groups for the facet UI
    #[must_use]
    pub fn age_groups(&self) -> Vec<String> {
        sorted_unique(self.voices.iter().map(|v| v.age_group.clone()))
    }
}
