//! Infrastructure layer - adapters for external systems
//!
//! Implements the ports defined in the application layer: the JSON config
//! store with atomic persistence and schema migration, plus the layered
//! server configuration that wires credentials into the provider configs.

pub mod config;
pub mod persistence;

pub use config::{AppConfig, DocumentSettings, ServerConfig, SpeechSettings, StorageConfig};
pub use persistence::JsonConfigStore;
