//! Application services

mod enrollment_service;
mod extraction_service;
mod synthesis_service;
mod voice_catalog;

pub use enrollment_service::{EnrollmentOutcome, EnrollmentRequest, EnrollmentService};
pub use extraction_service::ExtractionService;
pub use synthesis_service::{SynthesisOutcome, SynthesisRequest, SynthesisService};
pub use voice_catalog::{CatalogVoice, VoiceCatalog, VoiceFilter};
