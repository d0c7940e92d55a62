//! Application-level errors

use thiserror::Error;

use crate::ports::ConfigStoreError;

/// Errors surfaced by the application services
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain rule or user-input validation failed
    #[error(transparent)]
    Domain(#[from] domain::DomainError),

    /// Speech synthesis or enrollment failed
    #[error(transparent)]
    Speech(#[from] ai_speech::SpeechError),

    /// Document extraction failed
    #[error(transparent)]
    Document(#[from] ai_document::DocumentError),

    /// Persisted configuration could not be read or written
    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    /// Local file I/O failed (synthesis output, catalog files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
