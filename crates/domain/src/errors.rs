//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
