//! Types for document extraction

use serde::Serialize;

/// An uploaded document, passed by value.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Original filename as supplied by the client
    pub filename: String,
    /// File content
    pub content: Vec<u8>,
    /// Declared content type
    pub content_type: String,
}

impl DocumentInput {
    /// Create a new document input
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content,
            content_type: content_type.into(),
        }
    }

    /// Check if the upload has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Size of the document in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Normalized extraction result
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Extracted text, markdown where the service supports it
    pub content: String,
    /// Page count, when the service reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl Extraction {
    /// Create an extraction result with just content
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            page_count: None,
        }
    }

    /// Set the page count
    #[must_use]
    pub const fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Check if nothing was extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
