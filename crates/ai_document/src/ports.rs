//! Port definition for document extraction

use async_trait::async_trait;

use crate::error::DocumentError;
use crate::types::{DocumentInput, Extraction};

/// Port for document extraction implementations
///
/// Each adapter wraps one cloud extraction service. The hosting surface runs
/// every available extractor over the same upload so results can be compared
/// side by side.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Stable service identifier used in result reports
    fn name(&self) -> &'static str;

    /// Whether credentials were present at construction time
    fn available(&self) -> bool;

    /// Extract text from the document
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if the provider is unavailable, the document
    /// is rejected, or the service fails.
    async fn extract(&self, document: &DocumentInput) -> Result<Extraction, DocumentError>;
}
