//! Azure Content Understanding provider
//!
//! Runs a configured analyzer over the raw document bytes and polls the
//! returned `Operation-Location` until the analysis reaches a terminal
//! status. The markdown of every content element is concatenated into the
//! normalized extraction.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ContentUnderstandingConfig;
use crate::error::DocumentError;
use crate::ports::DocumentExtractor;
use crate::types::{DocumentInput, Extraction};

/// Azure Content Understanding adapter
#[derive(Debug, Clone)]
pub struct ContentUnderstandingProvider {
    client: Client,
    config: ContentUnderstandingConfig,
    available: bool,
}

#[derive(Deserialize)]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    result: Option<AnalyzeOperationResult>,
}

#[derive(Deserialize)]
struct AnalyzeOperationResult {
    #[serde(default)]
    contents: Vec<ContentElement>,
}

#[derive(Deserialize)]
struct ContentElement {
    #[serde(default)]
    markdown: String,
}

impl ContentUnderstandingProvider {
    /// Create a new provider; missing credentials yield an unavailable
    /// instance instead of an error.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn new(config: ContentUnderstandingConfig) -> Result<Self, DocumentError> {
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
            "{}/contentunderstanding/analyzers/{}:analyze?api-version={}",
            self.config.endpoint_base(),
            self.config.analyzer_id,
            self.config.api_version
        )
    }

    fn key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    async fn submit(&self, document: &DocumentInput) -> Result<String, DocumentError> {
        let content_type = if document.content_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            document.content_type.as_str()
        };

        let response = self
            .client
            .post(self.analyze_url())
            .header("Ocp-Apim-Subscription-Key", self.key())
            .header("Content-Type", content_type)
            .body(document.content.clone())
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
        let interval = Duration::from_millis(self.config.poll_interval_ms);

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
                tokio::time::sleep(interval).await;
                continue;
            }

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(DocumentError::ExtractionFailed(format!(
                    "poll returned {status}: {text}"
                )));
            }

            let operation: AnalyzeOperation = response.json().await.map_err(|e| {
                DocumentError::InvalidResponse(format!("response parse failed: {e}"))
            })?;

            match operation.status.to_lowercase().as_str() {
                "succeeded" => {
                    let result = operation.result.ok_or_else(|| {
                        DocumentError::InvalidResponse("succeeded without result".to_string())
                    })?;
                    let content = result
                        .contents
                        .iter()
                        .map(|element| element.markdown.as_str())
                        .filter(|markdown| !markdown.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join("\n\n");
                    return Ok(Extraction::new(content));
                },
                "failed" => {
                    return Err(DocumentError::ExtractionFailed(
                        "Content Understanding analysis failed".to_string(),
                    ));
                },
                _ => tokio::time::sleep(interval).await,
            }
        }
    }
}

#[async_trait]
impl DocumentExtractor for ContentUnderstandingProvider {
    fn name(&self) -> &'static str {
        "azure-content-understanding"
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

        debug!(analyzer = %self.config.analyzer_id, "Submitting document for analysis");
        let operation_url = self.submit(document).await?;
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
