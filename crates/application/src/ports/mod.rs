//! Port definitions for the application layer

mod config_repository;

pub use config_repository::{ConfigRepository, ConfigStoreError};
