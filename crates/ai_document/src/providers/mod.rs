//! Document extraction provider implementations

pub mod content_understanding;
pub mod doc_intel;

pub use content_understanding::ContentUnderstandingProvider;
pub use doc_intel::DocIntelProvider;
