//! Port for the persisted Personal Voice configuration
//!
//! The application mutates `PersonalVoiceConfig` in memory and persists it
//! through this port on every explicit mutation; there is no autosave loop.

use domain::PersonalVoiceConfig;
use thiserror::Error;

/// Errors raised by configuration persistence
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// The config file exists but could not be read
    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    /// The config file exists but is not valid structured data
    #[error("Config file {path} is not valid JSON: {message}")]
    Parse { path: String, message: String },

    /// The config file could not be written
    #[error("Failed to write config {path}: {message}")]
    Write { path: String, message: String },
}

impl ConfigStoreError {
    /// Create a read error
    pub fn read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Port for loading and saving the Personal Voice configuration
pub trait ConfigRepository: Send + Sync {
    /// Load the configuration, applying defaults and schema migration.
    ///
    /// An absent file yields the default configuration; a present but
    /// malformed file is an error.
    fn load(&self) -> Result<PersonalVoiceConfig, ConfigStoreError>;

    /// Persist the configuration atomically.
    fn save(&self, config: &PersonalVoiceConfig) -> Result<(), ConfigStoreError>;
}
