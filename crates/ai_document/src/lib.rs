//! AI Document - document extraction abstractions
//!
//! Provides the `DocumentExtractor` port and Azure adapters:
//! - `DocIntelProvider` - Document Intelligence prebuilt-layout analysis
//! - `ContentUnderstandingProvider` - analyzer-based Content Understanding
//!
//! Both services are submit-then-poll: the analyze call answers with an
//! `Operation-Location` header that is polled until a terminal status.
//! Providers built without endpoint + key report `available() == false` and
//! never touch the network.

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{ContentUnderstandingConfig, DocIntelConfig};
pub use error::DocumentError;
pub use ports::DocumentExtractor;
pub use providers::{ContentUnderstandingProvider, DocIntelProvider};
pub use types::{DocumentInput, Extraction};
