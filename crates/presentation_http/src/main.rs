//! VoxStudio HTTP Server
//!
//! Main entry point for the studio API server.

use std::sync::Arc;
use std::time::Duration;

use application::{ConfigRepository, ExtractionService, VoiceCatalog};
use ai_document::{ContentUnderstandingProvider, DocIntelProvider, DocumentExtractor};
use infrastructure::{AppConfig, JsonConfigStore};
use parking_lot::RwLock;
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxstudio_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("VoxStudio v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load server configuration
    let settings = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        let mut fallback = AppConfig::default();
        fallback.fill_credentials_with(|name| std::env::var(name).ok());
        fallback
    });

    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        config_path = %settings.storage.config_path.display(),
        "Configuration loaded"
    );

    // Load the persisted Personal Voice configuration. A malformed file is a
    // hard error here: starting with defaults would overwrite the user's
    // profiles on the next save.
    let repository: Arc<dyn ConfigRepository> = Arc::new(JsonConfigStore::new(
        settings.storage.config_path.clone(),
    ));
    let personal_voice = repository.load().map_err(|e| {
        anyhow::anyhow!("{e}. Fix or remove the file, then restart the server.")
    })?;
    info!(
        profiles = personal_voice.profiles.len(),
        selected = personal_voice.selected_profile_id.as_deref().unwrap_or("-"),
        "Personal Voice configuration loaded"
    );

    // Voice gallery (degrades to empty when the file is missing)
    let catalog = VoiceCatalog::load(&settings.storage.voice_gallery_path);

    // Extraction services; missing credentials leave a provider unavailable
    let doc_intel = DocIntelProvider::new(settings.doc_intel_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize Document Intelligence: {e}"))?;
    let content_understanding =
        ContentUnderstandingProvider::new(settings.content_understanding_config())
            .map_err(|e| anyhow::anyhow!("Failed to initialize Content Understanding: {e}"))?;
    let extractors: Vec<Arc<dyn DocumentExtractor>> =
        vec![Arc::new(doc_intel), Arc::new(content_understanding)];
    let extraction = ExtractionService::new(extractors);
    for (service, available) in extraction.services() {
        info!(service, available, "extraction service registered");
    }

    let state = AppState {
        settings: Arc::new(settings.clone()),
        config: Arc::new(RwLock::new(personal_voice)),
        repository,
        catalog: Arc::new(catalog),
        extraction: Arc::new(extraction),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if settings.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production mode: restrict to configured origins
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = settings
            .server
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    // Start server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout =
        Duration::from_secs(settings.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // The actual connection draining is handled by axum's graceful_shutdown
}
