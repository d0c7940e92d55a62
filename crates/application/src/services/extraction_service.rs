//! Per-service document extraction comparison
//!
//! Runs every registered extractor over the same upload and normalizes each
//! outcome into a `ServiceReport` row. Handler errors are captured, never
//! propagated.

use std::sync::Arc;
use std::time::Instant;

use ai_document::{DocumentExtractor, DocumentInput};
use tracing::{debug, instrument};

use crate::report::ServiceReport;

/// Fans one document out over all registered extraction services
pub struct ExtractionService {
    extractors: Vec<Arc<dyn DocumentExtractor>>,
}

impl std::fmt::Debug for ExtractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionService")
            .field("extractors", &self.extractors.len())
            .finish()
    }
}

impl ExtractionService {
    /// Create a new extraction service over the given adapters
    #[must_use]
    pub fn new(extractors: Vec<Arc<dyn DocumentExtractor>>) -> Self {
        Self { extractors }
    }

    /// `(service, available)` pairs for the hosting surface
    #[must_use]
    pub fn services(&self) -> Vec<(&'static str, bool)> {
        self.extractors
            .iter()
            .map(|extractor| (extractor.name(), extractor.available()))
            .collect()
    }

    /// Run every available extractor and collect one report per service.
    ///
    /// This never fails as a whole: per-service errors land in the report
    /// rows, and unavailable services are marked as such.
    #[instrument(skip(self, document), fields(filename = %document.filename))]
    pub async fn extract_all(&self, document: &DocumentInput) -> Vec<ServiceReport> {
        let mut reports = Vec::with_capacity(self.extractors.len());

        for extractor in &self.extractors {
            let service = extractor.name();
            if !extractor.available() {
                reports.push(ServiceReport::unavailable(service));
                continue;
            }

            let started = Instant::now();
            match extractor.extract(document).await {
                Ok(extraction) => {
                    debug!(service, chars = extraction.content.len(), "extraction succeeded");
                    let payload = serde_json::json!({
                        "content": extraction.content,
                        "content_chars": extraction.content.len(),
                        "page_count": extraction.page_count,
                    });
                    reports.push(ServiceReport::success(service, payload, started.elapsed()));
                },
                Err(err) => {
                    debug!(service, error = %err, "extraction failed");
                    reports.push(ServiceReport::failure(
                        service,
                        err.to_string(),
                        started.elapsed(),
                    ));
                },
            }
        }

        reports
    }
}
