//! JSON config store with atomic save and legacy-schema migration
//!
//! The persisted document is human-editable JSON at a fixed local path.
//! Saves go through a temp file in the same directory followed by a rename,
//! so a concurrent load never observes a partial write.

use std::path::{Path, PathBuf};

use application::{ConfigRepository, ConfigStoreError};
use chrono::{NaiveDate, Utc};
use domain::PersonalVoiceConfig;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File-backed implementation of `ConfigRepository`
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn first_env(lookup: EnvLookup<'_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Fill credential fields the file left empty from the conventional
/// environment variables. The file stays the primary source.
fn fill_from_env(config: &mut PersonalVoiceConfig, lookup: EnvLookup<'_>) {
    if config
        .speech_key
        .as_deref()
        .is_none_or(|key| key.trim().is_empty())
    {
        config.speech_key = first_env(lookup, &["AZURE_SPEECH_KEY", "SPEECH_KEY"]);
    }
    if config.speech_region.trim().is_empty() {
        if let Some(region) = first_env(lookup, &["AZURE_SPEECH_REGION", "SPEECH_REGION"]) {
            config.speech_region = region;
        }
    }
}

impl JsonConfigStore {
    /// Create a store over the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_with(
        &self,
        today: NaiveDate,
        lookup: EnvLookup<'_>,
    ) -> Result<PersonalVoiceConfig, ConfigStoreError> {
        let path_str = self.path.display().to_string();

        if !self.path.exists() {
            debug!(path = %path_str, "config file absent, starting from defaults");
            let mut config = PersonalVoiceConfig::default();
            fill_from_env(&mut config, lookup);
            return Ok(config);
        }

        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigStoreError::read(path_str.as_str(), e.to_string()))?;
        let document: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ConfigStoreError::parse(path_str.as_str(), e.to_string()))?;
        if !document.is_object() {
            return Err(ConfigStoreError::parse(
                path_str.as_str(),
                "top-level value is not an object",
            ));
        }

        // The legacy shape carried a bare speaker_profile_id instead of a
        // profiles array. Capture it before deserializing; the field does not
        // exist on the struct, so it disappears from memory and from the next
        // save automatically.
        let legacy_speaker_profile_id = document
            .get("speaker_profile_id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut config: PersonalVoiceConfig = serde_json::from_value(document)
            .map_err(|e| ConfigStoreError::parse(path_str.as_str(), e.to_string()))?;

        if config.profiles.is_empty() && !legacy_speaker_profile_id.is_empty() {
            config.add_profile_on(today, "Migrated Profile", &legacy_speaker_profile_id);
            info!(path = %path_str, "migrated legacy single-profile config");
        }

        fill_from_env(&mut config, lookup);
        Ok(config)
    }
}

impl ConfigRepository for JsonConfigStore {
    fn load(&self) -> Result<PersonalVoiceConfig, ConfigStoreError> {
        self.load_with(Utc::now().date_naive(), &|name| std::env::var(name).ok())
    }

    fn save(&self, config: &PersonalVoiceConfig) -> Result<(), ConfigStoreError> {
        let path_str = self.path.display().to_string();
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigStoreError::write(path_str.as_str(), e.to_string()))?;

        // Write-then-rename keeps loads from ever seeing a partial file.
        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| ConfigStoreError::write(path_str.as_str(), e.to_string()))?;
        serde_json::to_writer_pretty(&mut temp, config)
            .map_err(|e| ConfigStoreError::write(path_str.as_str(), e.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| ConfigStoreError::write(path_str.as_str(), e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| ConfigStoreError::write(path_str.as_str(), e.error.to_string()))?;

        debug!(path = %path_str, profiles = config.profiles.len(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn no_env(_name: &str) -> Option<String> {
        None
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonConfigStore {
        JsonConfigStore::new(dir.path().join(".conf").join("personal_voice_config.json"))
    }

    #[test]
    fn absent_file_yields_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let config = store.load_with(date("2026-01-12"), &no_env).unwrap();

        assert_eq!(config, PersonalVoiceConfig::default());
    }

    #[test]
    fn absent_file_fills_credentials_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let lookup = |name: &str| match name {
            "AZURE_SPEECH_KEY" => Some("env-key".to_string()),
            "SPEECH_REGION" => Some("westeurope".to_string()),
            _ => None,
        };

        let config = store.load_with(date("2026-01-12"), &lookup).unwrap();

        assert_eq!(config.speech_key.as_deref(), Some("env-key"));
        assert_eq!(config.speech_region, "westeurope");
    }

    #[test]
    fn file_values_win_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let config = PersonalVoiceConfig {
            speech_key: Some("file-key".to_string()),
            speech_region: "eastus".to_string(),
            ..PersonalVoiceConfig::default()
        };
        store.save(&config).unwrap();

        let lookup = |_: &str| Some("env-value".to_string());
        let loaded = store.load_with(date("2026-01-12"), &lookup).unwrap();

        assert_eq!(loaded.speech_key.as_deref(), Some("file-key"));
        assert_eq!(loaded.speech_region, "eastus");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"not json at all").unwrap();

        let err = store.load_with(date("2026-01-12"), &no_env).unwrap_err();
        assert!(matches!(err, ConfigStoreError::Parse { .. }));
    }

    #[test]
    fn non_object_document_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"[1, 2, 3]").unwrap();

        let err = store.load_with(date("2026-01-12"), &no_env).unwrap_err();
        assert!(matches!(err, ConfigStoreError::Parse { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = PersonalVoiceConfig {
            speech_key: Some("k".to_string()),
            speech_region: "eastus".to_string(),
            ..PersonalVoiceConfig::default()
        };
        config.add_profile_on(date("2026-01-12"), "Alice", "guid-1");
        config.add_profile_on(date("2026-01-12"), "Bob", "guid-2");

        store.save(&config).unwrap();
        let loaded = store.load_with(date("2026-01-12"), &no_env).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn legacy_config_migrates_to_single_selected_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), br#"{"speaker_profile_id": "abc-123"}"#).unwrap();

        let config = store.load_with(date("2026-01-12"), &no_env).unwrap();

        assert_eq!(config.profiles.len(), 1);
        let profile = &config.profiles[0];
        assert_eq!(profile.name, "Migrated Profile");
        assert_eq!(profile.id, "profile_2026_01_12_1");
        assert_eq!(profile.speaker_profile_id, "abc-123");
        assert_eq!(config.selected_profile_id.as_deref(), Some("profile_2026_01_12_1"));
    }

    #[test]
    fn migrated_save_drops_legacy_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), br#"{"speaker_profile_id": "abc-123"}"#).unwrap();

        let config = store.load_with(date("2026-01-12"), &no_env).unwrap();
        store.save(&config).unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(document.get("speaker_profile_id").is_none());
        assert_eq!(document["profiles"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn migration_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), br#"{"speaker_profile_id": "abc-123"}"#).unwrap();

        let first = store.load_with(date("2026-01-12"), &no_env).unwrap();
        store.save(&first).unwrap();
        let second = store.load_with(date("2026-01-12"), &no_env).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.profiles.len(), 1);
    }

    #[test]
    fn blank_legacy_field_does_not_migrate() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), br#"{"speaker_profile_id": "   "}"#).unwrap();

        let config = store.load_with(date("2026-01-12"), &no_env).unwrap();
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&PersonalVoiceConfig::default()).unwrap();

        let parent = store.path().parent().unwrap();
        let entries: Vec<_> = std::fs::read_dir(parent).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(store.path().exists());
    }

    #[test]
    fn load_is_unaffected_by_an_interrupted_looking_write() {
        // A stray temp file next to the config must not break loading.
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&PersonalVoiceConfig::default()).unwrap();

        let mut stray =
            std::fs::File::create(store.path().parent().unwrap().join(".tmpstray")).unwrap();
        stray.write_all(b"{ partial").unwrap();

        assert!(store.load_with(date("2026-01-12"), &no_env).is_ok());
    }
}
