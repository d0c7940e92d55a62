//! Configuration for the Azure Speech providers

use domain::PersonalVoiceConfig;

/// Credentials accepted by the Azure Speech endpoints.
///
/// Subscription keys are the common path; bearer tokens cover
/// workload-identity auth, where multi-service resources require the
/// `aad#<resource-id>#<token>` composition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeechCredentials {
    /// No credentials configured; the provider reports itself unavailable
    #[default]
    None,
    /// Azure Speech subscription key
    SubscriptionKey(String),
    /// AAD access token, optionally scoped to a resource id
    BearerToken {
        token: String,
        resource_id: Option<String>,
    },
}

impl SpeechCredentials {
    /// Whether usable credentials are present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self {
            Self::None => false,
            Self::SubscriptionKey(key) => !key.trim().is_empty(),
            Self::BearerToken { token, .. } => !token.trim().is_empty(),
        }
    }

    /// Attach the credentials to an outgoing request
    #[must_use]
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::None => request,
            Self::SubscriptionKey(key) => request.header("Ocp-Apim-Subscription-Key", key),
            Self::BearerToken { token, resource_id } => {
                let bearer = resource_id.as_ref().map_or_else(
                    || token.clone(),
                    |resource_id| format!("aad#{resource_id}#{token}"),
                );
                request.bearer_auth(bearer)
            },
        }
    }
}

/// Configuration for the Azure Speech providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureSpeechConfig {
    /// Azure Speech resource region (e.g. "eastus")
    pub region: String,

    /// Credentials for both synthesis and enrollment calls
    pub credentials: SpeechCredentials,

    /// Base model voice name used in SSML
    pub voice_name: String,

    /// SSML language
    pub language: String,

    /// Custom Voice REST API version for enrollment calls
    pub custom_voice_api_version: String,

    /// Override for the TTS endpoint (tests; defaults to the regional host)
    pub tts_endpoint: Option<String>,

    /// Override for the Custom Voice endpoint (tests; defaults to the
    /// regional host)
    pub management_endpoint: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Interval between operation-status polls in milliseconds
    pub poll_interval_ms: u64,

    /// Overall deadline for operation polling in milliseconds
    pub poll_timeout_ms: u64,
}

impl Default for AzureSpeechConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            credentials: SpeechCredentials::None,
            voice_name: "DragonLatestNeural".to_string(),
            language: "en-US".to_string(),
            custom_voice_api_version: domain::DEFAULT_CUSTOM_VOICE_API_VERSION.to_string(),
            tts_endpoint: None,
            management_endpoint: None,
            timeout_ms: 30_000,
            poll_interval_ms: 2_000,
            poll_timeout_ms: 300_000,
        }
    }
}

impl AzureSpeechConfig {
    /// Derive a provider configuration from the persisted Personal Voice
    /// config. Key-based credentials come straight from the config; bearer
    /// tokens are layered on with [`Self::with_bearer_token`].
    #[must_use]
    pub fn from_personal_voice(config: &PersonalVoiceConfig) -> Self {
        let credentials = config
            .speech_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map_or(SpeechCredentials::None, |key| {
                SpeechCredentials::SubscriptionKey(key.to_string())
            });

        Self {
            region: config.speech_region.clone(),
            credentials,
            voice_name: config.voice_name.clone(),
            language: config.language.clone(),
            custom_voice_api_version: config.custom_voice_api_version.clone(),
            ..Self::default()
        }
    }

    /// Replace the credentials with a workload-identity bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: String, resource_id: Option<String>) -> Self {
        self.credentials = SpeechCredentials::BearerToken { token, resource_id };
        self
    }

    /// Whether the provider built from this config can reach the service
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let has_host = !self.region.trim().is_empty()
            || self.tts_endpoint.is_some()
            || self.management_endpoint.is_some();
        has_host && self.credentials.is_configured()
    }

    /// Base URL for synthesis and the voice catalog
    #[must_use]
    pub fn tts_host(&self) -> String {
        self.tts_endpoint.clone().unwrap_or_else(|| {
            format!("https://{}.tts.speech.microsoft.com", self.region)
        })
    }

    /// Base URL for the Custom Voice management API
    #[must_use]
    pub fn management_host(&self) -> String {
        self.management_endpoint.clone().unwrap_or_else(|| {
            format!("https://{}.api.cognitive.microsoft.com", self.region)
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is internally inconsistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }
        if self.custom_voice_api_version.trim().is_empty() {
            return Err("Custom Voice API version must not be empty".to_string());
        }
        Ok(())
    }

    /// Create a minimal config for testing
    #[cfg(test)]
    pub(crate) fn test(endpoint: &str) -> Self {
        Self {
            credentials: SpeechCredentials::SubscriptionKey("test-key".to_string()),
            tts_endpoint: Some(endpoint.to_string()),
            management_endpoint: Some(endpoint.to_string()),
            poll_interval_ms: 10,
            poll_timeout_ms: 1_000,
            ..Self::default()
        }
    }
}
