//! Document extraction comparison endpoint

use axum::Json;
use axum::extract::{Multipart, State};
use ai_document::DocumentInput;
use application::ServiceReport;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Per-service comparison result for one upload
#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub filename: String,
    pub reports: Vec<ServiceReport>,
}

/// `POST /v1/extract`
///
/// Takes one uploaded document and runs it through every configured
/// extraction service; unavailable services appear as greyed-out rows.
pub async fn extract_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let mut document: Option<DocumentInput> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("document") {
            let filename = field.file_name().unwrap_or("upload.bin").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable upload: {e}")))?;
            document = Some(DocumentInput::new(filename, bytes.to_vec(), content_type));
        }
    }

    let document = document
        .ok_or_else(|| ApiError::BadRequest("a 'document' file field is required".to_string()))?;
    if document.is_empty() {
        return Err(ApiError::BadRequest("uploaded document is empty".to_string()));
    }

    let reports = state.extraction.extract_all(&document).await;

    Ok(Json(ExtractionResponse {
        filename: document.filename,
        reports,
    }))
}
