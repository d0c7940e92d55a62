//! Persistence adapters

mod config_store;

pub use config_store::JsonConfigStore;
