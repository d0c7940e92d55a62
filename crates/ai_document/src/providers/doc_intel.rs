//! Azure Document Intelligence provider
//!
//! Submits the document as a base64 JSON body to the layout model and polls
//! the `Operation-Location` with exponential backoff. A 429 during polling
//! honors `Retry-After`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DocIntelConfig;
use crate::error::DocumentError;
use crate::ports::DocumentExtractor;
use crate::types::{DocumentInput, Extraction};

/// Azure Document Intelligence adapter
#[derive(Debug, Clone)]
pub struct DocIntelProvider {
    client: Client,
    config: DocIntelConfig,
    available: bool,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
struct AnalyzeResult {
    content: String,
    #[serde(default)]
    pages: Vec<serde_json::Value>,
}

impl DocIntelProvider {
    /// Create a new provider; missing credentials yield an unavailable
    /// instance instead of an error.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn new(config: DocIntelConfig) -> Result<Self, DocumentError> {
        let available = config.is_configured();
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                DocumentError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            available,
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&outputContentFormat=markdown",
            self.config.endpoint_base(),
            self.config.model,
            self.config.api_version
        )
    }

    fn key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    async fn submit(&self, data: &[u8]) -> Result<String, DocumentError> {
        let body = serde_json::json!({ "base64Source": general_purpose::STANDARD.encode(data) });

        let response = self
            .client
            .post(self.analyze_url())
            .header("Ocp-Apim-Subscription-Key", self.key())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DocumentError::ExtractionFailed(format!(
                "submit returned {status}: {text}"
            )));
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| {
                DocumentError::InvalidResponse(
                    "response missing Operation-Location header".to_string(),
                )
            })
    }

    async fn poll_until_complete(&self, operation_url: &str) -> Result<Extraction, DocumentError> {
        let started = Instant::now();
        let deadline = Duration::from_millis(self.config.poll_timeout_ms);
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);
        let max_backoff = Duration::from_millis(self.config.max_backoff_ms);

        loop {
            if started.elapsed() > deadline {
                return Err(DocumentError::PollTimedOut(self.config.poll_timeout_ms));
            }

            let response = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", self.key())
                .send()
                .await?;

            if response.status().as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map_or(backoff, Duration::from_secs);
                tokio::time::sleep(retry_after).await;
                continue;
            }

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(DocumentError::ExtractionFailed(format!(
                    "poll returned {status}: {text}"
                )));
            }

            let result: AnalyzeResponse = response.json().await.map_err(|e| {
                DocumentError::InvalidResponse(format!("response parse failed: {e}"))
            })?;

            match result.status.to_lowercase().as_str() {
                "succeeded" => {
                    let analyze = result.analyze_result.ok_or_else(|| {
                        DocumentError::InvalidResponse("succeeded without analyzeResult".to_string())
                    })?;
                    let page_count = u32::try_from(analyze.pages.len()).ok();
                    return Ok(Extraction {
                        content: analyze.content,
                        page_count: page_count.filter(|count| *count > 0),
                    });
                },
                "failed" => {
                    return Err(DocumentError::ExtractionFailed(
                        "Document Intelligence analysis failed".to_string(),
                    ));
                },
                _ => {
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(max_backoff);
                },
            }
        }
    }
}

#[async_trait]
impl DocumentExtractor for DocIntelProvider {
    fn name(&self) -> &'static str {
        "azure-document-intelligence"
    }

    fn available(&self) -> bool {
        self.available
    }

    #[instrument(skip(self, document), fields(filename = %document.filename, size = document.size_bytes()))]
    async fn extract(&self, document: &DocumentInput) -> Result<Extraction, DocumentError> {
        if !self.available {
            return Err(DocumentError::NotAvailable(self.name().to_string()));
        }
        if document.is_empty() {
            return Err(DocumentError::InvalidDocument(
                "document is empty".to_string(),
            ));
        }

        debug!("Submitting document for layout analysis");
        let operation_url = self.submit(&document.content).await?;
        let extraction = self.poll_until_complete(&operation_url).await?;

        if extraction.is_empty() {
            return Err(DocumentError::ExtractionFailed(format!(
                "no text found in {}",
                document.filename
            )));
        }

        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> DocIntelProvider {
        DocIntelProvider::new(DocIntelConfig {
            endpoint: Some(server.uri()),
            api_key: Some("di-key".to_string()),
            initial_backoff_ms: 5,
            max_backoff_ms: 10,
            poll_timeout_ms: 2_000,
            ..DocIntelConfig::default()
        })
        .unwrap()
    }

    fn pdf() -> DocumentInput {
        DocumentInput::new("report.pdf", b"%PDF-1.7 fake".to_vec(), "application/pdf")
    }

    #[tokio::test]
    async fn extract_submits_base64_and_polls_to_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documentintelligence/documentModels/prebuilt-layout:analyze"))
            .and(header("Ocp-Apim-Subscription-Key", "di-key"))
            .and(body_string_contains("base64Source"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header(
                        "Operation-Location",
                        format!("{}/documentintelligence/operations/op-1", server.uri()).as_str(),
                    ),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/documentintelligence/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "running"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/documentintelligence/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "succeeded",
                "analyzeResult": {
                    "content": "# Report\n\nHello",
                    "pages": [{}, {}]
                }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let extraction = provider.extract(&pdf()).await.unwrap();

        assert_eq!(extraction.content, "# Report\n\nHello");
        assert_eq!(extraction.page_count, Some(2));
    }

    #[tokio::test]
    async fn missing_operation_location_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documentintelligence/documentModels/prebuilt-layout:analyze"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider.extract(&pdf()).await.unwrap_err();

        assert!(matches!(err, DocumentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn failed_analysis_maps_to_extraction_failed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documentintelligence/documentModels/prebuilt-layout:analyze"))
            .respond_with(ResponseTemplate::new(202).insert_header(
                "Operation-Location",
                format!("{}/documentintelligence/operations/op-2", server.uri()).as_str(),
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/documentintelligence/operations/op-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "failed"
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider.extract(&pdf()).await.unwrap_err();

        assert!(matches!(err, DocumentError::ExtractionFailed(_)));
    }

    #[tokio::test]
    async fn empty_document_is_rejected_locally() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);

        let doc = DocumentInput::new("empty.pdf", Vec::new(), "application/pdf");
        let err = provider.extract(&doc).await.unwrap_err();

        assert!(matches!(err, DocumentError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn unavailable_provider_short_circuits() {
        let provider = DocIntelProvider::new(DocIntelConfig::default()).unwrap();

        assert!(!provider.available());
        assert!(matches!(
            provider.extract(&pdf()).await,
            Err(DocumentError::NotAvailable(_))
        ));
    }
}
