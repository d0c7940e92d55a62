//! Application configuration
//!
//! Layered: built-in defaults, then `voxstudio.toml`, then `VOXSTUDIO__*`
//! environment overrides (e.g. `VOXSTUDIO__SERVER__PORT`). Azure credentials
//! are filled in afterwards from their conventional environment variables;
//! an absent variable disables the integration instead of erroring.

use std::path::PathBuf;

use ai_document::{ContentUnderstandingConfig, DocIntelConfig};
use ai_speech::AzureSpeechConfig;
use domain::PersonalVoiceConfig;
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// CORS allowlist; empty allows any origin (development mode)
    pub allowed_origins: Vec<String>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: None,
        }
    }
}

/// Local file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persisted Personal Voice configuration (gitignored, holds secrets)
    pub config_path: PathBuf,
    /// Directory for synthesized WAV output
    pub output_dir: PathBuf,
    /// Curated voice gallery JSON
    pub voice_gallery_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(".conf/personal_voice_config.json"),
            output_dir: PathBuf::from("outputs/temp"),
            voice_gallery_path: PathBuf::from("inputs/voice_gallery_voices.json"),
        }
    }
}

/// Azure Speech settings beyond what the persisted config carries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Resource id for workload-identity auth against multi-service
    /// resources (`aad#<resource-id>#<token>` form)
    pub resource_id: Option<String>,
    /// Pre-acquired AAD access token; used when no subscription key is set
    pub auth_token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Interval between enrollment-operation polls in milliseconds
    pub poll_interval_ms: u64,
    /// Overall deadline for enrollment-operation polling in milliseconds
    pub poll_timeout_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            resource_id: None,
            auth_token: None,
            timeout_ms: 30_000,
            poll_interval_ms: 2_000,
            poll_timeout_ms: 300_000,
        }
    }
}

/// Document extraction service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Document Intelligence endpoint
    pub docintel_endpoint: Option<String>,
    /// Document Intelligence key
    pub docintel_key: Option<String>,
    /// Content Understanding endpoint
    pub content_understanding_endpoint: Option<String>,
    /// Content Understanding key
    pub content_understanding_key: Option<String>,
    /// Content Understanding analyzer id override
    pub content_understanding_analyzer: Option<String>,
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Local file locations
    pub storage: StorageConfig,
    /// Azure Speech settings
    pub speech: SpeechSettings,
    /// Document extraction settings
    pub document: DocumentSettings,
}

fn first_env(
    lookup: &impl Fn(&str) -> Option<String>,
    names: &[&str],
) -> Option<String> {
    names.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

impl AppConfig {
    /// Load configuration from `voxstudio.toml` and `VOXSTUDIO__*` overrides,
    /// then fill credentials from the conventional Azure environment
    /// variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .add_source(config::File::with_name("voxstudio").required(false))
            .add_source(
                config::Environment::with_prefix("VOXSTUDIO")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut app_config: Self = builder.build()?.try_deserialize()?;
        app_config.fill_credentials_with(|name| std::env::var(name).ok());
        Ok(app_config)
    }

    /// Fill credential fields that are still unset from an environment
    /// lookup. Split out so tests can inject a lookup instead of mutating
    /// the process environment.
    pub fn fill_credentials_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.speech.resource_id.is_none() {
            self.speech.resource_id = first_env(&lookup, &["AZURE_SPEECH_RESOURCE_ID"]);
        }
        if self.speech.auth_token.is_none() {
            self.speech.auth_token = first_env(&lookup, &["AZURE_SPEECH_AUTH_TOKEN"]);
        }
        if self.document.docintel_endpoint.is_none() {
            self.document.docintel_endpoint = first_env(&lookup, &["AZURE_DOCINTEL_ENDPOINT"]);
        }
        if self.document.docintel_key.is_none() {
            self.document.docintel_key = first_env(&lookup, &["AZURE_DOCINTEL_KEY"]);
        }
        if self.document.content_understanding_endpoint.is_none() {
            self.document.content_understanding_endpoint =
                first_env(&lookup, &["AZURE_CONTENT_UNDERSTANDING_ENDPOINT"]);
        }
        if self.document.content_understanding_key.is_none() {
            self.document.content_understanding_key =
                first_env(&lookup, &["AZURE_CONTENT_UNDERSTANDING_KEY"]);
        }
        if self.document.content_understanding_analyzer.is_none() {
            self.document.content_understanding_analyzer =
                first_env(&lookup, &["AZURE_CONTENT_UNDERSTANDING_ANALYZER"]);
        }
    }

    /// Build the speech provider configuration from the live persisted
    /// config. A subscription key in the persisted config wins; otherwise a
    /// pre-acquired bearer token from the settings is used.
    #[must_use]
    pub fn speech_config(&self, personal_voice: &PersonalVoiceConfig) -> AzureSpeechConfig {
        let mut speech = AzureSpeechConfig::from_personal_voice(personal_voice);
        speech.timeout_ms = self.speech.timeout_ms;
        speech.poll_interval_ms = self.speech.poll_interval_ms;
        speech.poll_timeout_ms = self.speech.poll_timeout_ms;

        if !speech.credentials.is_configured() {
            if let Some(token) = self
                .speech
                .auth_token
                .as_deref()
                .filter(|token| !token.trim().is_empty())
            {
                speech = speech
                    .with_bearer_token(token.to_string(), self.speech.resource_id.clone());
            }
        }
        speech
    }

    /// Build the Document Intelligence provider configuration
    #[must_use]
    pub fn doc_intel_config(&self) -> DocIntelConfig {
        DocIntelConfig {
            endpoint: self.document.docintel_endpoint.clone(),
            api_key: self.document.docintel_key.clone(),
            ..DocIntelConfig::default()
        }
    }

    /// Build the Content Understanding provider configuration
    #[must_use]
    pub fn content_understanding_config(&self) -> ContentUnderstandingConfig {
        let mut cu_config = ContentUnderstandingConfig {
            endpoint: self.document.content_understanding_endpoint.clone(),
            api_key: self.document.content_understanding_key.clone(),
            ..ContentUnderstandingConfig::default()
        };
        if let Some(analyzer) = self
            .document
            .content_understanding_analyzer
            .as_deref()
            .filter(|a| !a.trim().is_empty())
        {
            cu_config.analyzer_id = analyzer.to_string();
        }
        cu_config
    }
}
