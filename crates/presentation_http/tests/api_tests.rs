//! API tests over the full handler stack
//!
//! Uses a tempdir-backed config store and stub extraction services; no
//! network access.

use std::sync::Arc;

use ai_document::{DocumentError, DocumentExtractor, DocumentInput, Extraction};
use application::{ConfigRepository, ExtractionService, VoiceCatalog};
use async_trait::async_trait;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use domain::PersonalVoiceConfig;
use infrastructure::{AppConfig, JsonConfigStore};
use parking_lot::RwLock;
use presentation_http::{AppState, create_router};

struct StubExtractor {
    name: &'static str,
    available: bool,
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self) -> bool {
        self.available
    }

    async fn extract(&self, document: &DocumentInput) -> Result<Extraction, DocumentError> {
        Ok(Extraction::new(format!("stub text of {}", document.filename)))
    }
}

fn test_server(dir: &tempfile::TempDir) -> (TestServer, Arc<dyn ConfigRepository>) {
    let repository: Arc<dyn ConfigRepository> = Arc::new(JsonConfigStore::new(
        dir.path().join(".conf").join("personal_voice_config.json"),
    ));

    let mut settings = AppConfig::default();
    settings.storage.output_dir = dir.path().join("outputs");

    let state = AppState {
        settings: Arc::new(settings),
        config: Arc::new(RwLock::new(PersonalVoiceConfig::default())),
        repository: Arc::clone(&repository),
        catalog: Arc::new(VoiceCatalog::default()),
        extraction: Arc::new(ExtractionService::new(vec![
            Arc::new(StubExtractor {
                name: "stub-a",
                available: true,
            }),
            Arc::new(StubExtractor {
                name: "stub-b",
                available: false,
            }),
        ])),
    };

    (
        TestServer::new(create_router(state)).unwrap(),
        repository,
    )
}

#[tokio::test]
async fn health_and_readiness_respond() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<serde_json::Value>()["status"], "ok");

    let ready = server.get("/ready").await;
    ready.assert_status_ok();
    let body = ready.json::<serde_json::Value>();
    assert_eq!(body["speech_available"], false);
    assert_eq!(body["extraction_services"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pricing_lists_three_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    let response = server.get("/v1/pricing").await;
    response.assert_status_ok();

    let tiers = response.json::<serde_json::Value>();
    assert_eq!(tiers.as_array().unwrap().len(), 3);
    assert_eq!(tiers[1]["service"], "Personal Voice");
}

#[tokio::test]
async fn profile_registry_flow_persists_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let (server, repository) = test_server(&dir);

    // Create two profiles
    let created = server
        .post("/v1/profiles")
        .json(&serde_json::json!({ "name": "Alice", "speaker_profile_id": "guid-1" }))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let alice = created.json::<serde_json::Value>();
    let alice_id = alice["id"].as_str().unwrap().to_string();

    server
        .post("/v1/profiles")
        .json(&serde_json::json!({ "name": "Bob", "speaker_profile_id": "guid-2" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Listing shows both, Bob selected (latest add wins)
    let listing = server.get("/v1/profiles").await.json::<serde_json::Value>();
    assert_eq!(listing["profiles"].as_array().unwrap().len(), 2);
    assert_eq!(listing["profiles"][1]["selected"], true);

    // Select Alice back
    let selected = server
        .post(&format!("/v1/profiles/{alice_id}/select"))
        .await
        .json::<serde_json::Value>();
    assert_eq!(selected["selected_profile_id"], alice_id.as_str());

    // Rename Alice
    let renamed = server
        .put(&format!("/v1/profiles/{alice_id}"))
        .json(&serde_json::json!({ "name": "Alice Prime" }))
        .await
        .json::<serde_json::Value>();
    assert!(
        renamed["display_label"]
            .as_str()
            .unwrap()
            .contains("Alice Prime")
    );

    // Every step went through the store
    let persisted = repository.load().unwrap();
    assert_eq!(persisted.profiles.len(), 2);
    assert_eq!(persisted.profiles[0].name, "Alice Prime");
    assert_eq!(persisted.selected_profile_id.as_deref(), Some(alice_id.as_str()));

    // Deleting the selected profile clears the selection
    server
        .delete(&format!("/v1/profiles/{alice_id}"))
        .await
        .assert_status_ok();
    let after_delete = repository.load().unwrap();
    assert_eq!(after_delete.profiles.len(), 1);
    assert!(after_delete.selected_profile_id.is_none());
}

#[tokio::test]
async fn missing_profile_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    server
        .post("/v1/profiles/profile_2099_01_01_1/select")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_speaker_profile_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    server
        .post("/v1/profiles")
        .json(&serde_json::json!({ "name": "X", "speaker_profile_id": "" }))
        .await
        .assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn config_view_masks_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    server
        .put("/v1/config")
        .json(&serde_json::json!({
            "speech_region": "eastus",
            "speech_key": "abcd1234"
        }))
        .await
        .assert_status_ok();

    let view = server.get("/v1/config").await.json::<serde_json::Value>();
    assert_eq!(view["speech_region"], "eastus");
    assert_eq!(view["speech_key_masked"], "****1234");
}

#[tokio::test]
async fn synthesize_without_credentials_is_a_clear_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    let response = server
        .post("/v1/synthesize")
        .json(&serde_json::json!({ "text": "Hello" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("missing required config values")
    );
}

#[tokio::test]
async fn extract_compares_all_registered_services() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    let form = MultipartForm::new().add_part(
        "document",
        Part::bytes(b"%PDF-1.7 fake".to_vec())
            .file_name("paper.pdf")
            .mime_type("application/pdf"),
    );

    let response = server.post("/v1/extract").multipart(form).await;
    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["filename"], "paper.pdf");
    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["service"], "stub-a");
    assert_eq!(reports[0]["payload"]["content"], "stub text of paper.pdf");
    assert_eq!(reports[1]["available"], false);
}

#[tokio::test]
async fn extract_without_document_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _) = test_server(&dir);

    let form = MultipartForm::new().add_text("note", "no file here");
    server
        .post("/v1/extract")
        .multipart(form)
        .await
        .assert_status(axum::http::StatusCode::BAD_REQUEST);
}
