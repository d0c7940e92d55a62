//! Configuration for the document extraction providers

/// Configuration for Azure Document Intelligence
#[derive(Debug, Clone)]
pub struct DocIntelConfig {
    /// Resource endpoint (e.g. `https://<name>.cognitiveservices.azure.com`)
    pub endpoint: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// REST API version
    pub api_version: String,
    /// Analysis model id
    pub model: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Initial poll backoff in milliseconds (doubles up to the maximum)
    pub initial_backoff_ms: u64,
    /// Maximum poll backoff in milliseconds
    pub max_backoff_ms: u64,
    /// Overall deadline for polling in milliseconds
    pub poll_timeout_ms: u64,
}

impl Default for DocIntelConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: "2024-11-30".to_string(),
            model: "prebuilt-layout".to_string(),
            timeout_ms: 30_000,
            initial_backoff_ms: 2_000,
            max_backoff_ms: 60_000,
            poll_timeout_ms: 300_000,
        }
    }
}

impl DocIntelConfig {
    /// Whether endpoint and key are both present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let has_endpoint = self
            .endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        has_endpoint && has_key
    }

    /// Endpoint with any trailing slash removed
    #[must_use]
    pub fn endpoint_base(&self) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string()
    }
}

/// Configuration for Azure Content Understanding
#[derive(Debug, Clone)]
pub struct ContentUnderstandingConfig {
    /// Resource endpoint
    pub endpoint: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Analyzer id to run
    pub analyzer_id: String,
    /// REST API version
    pub api_version: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Interval between polls in milliseconds
    pub poll_interval_ms: u64,
    /// Overall deadline for polling in milliseconds
    pub poll_timeout_ms: u64,
}

impl Default for ContentUnderstandingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            analyzer_id: "prebuilt-documentAnalyzer".to_string(),
            api_version: "2024-12-01-preview".to_string(),
            timeout_ms: 30_000,
            poll_interval_ms: 2_000,
            poll_timeout_ms: 300_000,
        }
    }
}

impl ContentUnderstandingConfig {
    /// Whether endpoint and key are both present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let has_endpoint = self
            .endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        has_endpoint && has_key
    }

    /// Endpoint with any trailing slash removed
    #[must_use]
    pub fn endpoint_base(&self) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_doc_intel_config_is_unconfigured() {
        let config = DocIntelConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.model, "prebuilt-layout");
        assert_eq!(config.api_version, "2024-11-30");
    }

    #[test]
    fn doc_intel_requires_both_endpoint_and_key() {
        let config = DocIntelConfig {
            endpoint: Some("https://x.cognitiveservices.azure.com".to_string()),
            ..DocIntelConfig::default()
        };
        assert!(!config.is_configured());

        let config = DocIntelConfig {
            endpoint: Some("https://x.cognitiveservices.azure.com".to_string()),
            api_key: Some("k".to_string()),
            ..DocIntelConfig::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn endpoint_base_strips_trailing_slash() {
        let config = DocIntelConfig {
            endpoint: Some("https://x.cognitiveservices.azure.com/".to_string()),
            ..DocIntelConfig::default()
        };
        assert_eq!(config.endpoint_base(), "https://x.cognitiveservices.azure.com");
    }

    #[test]
    fn default_content_understanding_uses_prebuilt_analyzer() {
        let config = ContentUnderstandingConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.analyzer_id, "prebuilt-documentAnalyzer");
    }

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let config = ContentUnderstandingConfig {
            endpoint: Some("https://x".to_string()),
            api_key: Some("   ".to_string()),
            ..ContentUnderstandingConfig::default()
        };
        assert!(!config.is_configured());
    }
}
