//! VoxStudio HTTP surface
//!
//! Exposes the configuration, profile registry, voice gallery, synthesis,
//! enrollment, extraction, and pricing pages as a JSON API consumed by the
//! browser front end.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
