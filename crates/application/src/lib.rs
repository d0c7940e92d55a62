//! Application layer for VoxStudio
//!
//! Orchestrates the domain registry and the speech/document ports into the
//! uniform result shape consumed by the HTTP surface. Defines the
//! `ConfigRepository` port that the persistence adapter implements.

pub mod error;
pub mod ports;
pub mod report;
pub mod services;

pub use error::ApplicationError;
pub use ports::{ConfigRepository, ConfigStoreError};
pub use report::ServiceReport;
pub use services::{
    CatalogVoice, EnrollmentOutcome, EnrollmentRequest, EnrollmentService, ExtractionService,
    SynthesisOutcome, SynthesisRequest, SynthesisService, VoiceCatalog, VoiceFilter,
};
