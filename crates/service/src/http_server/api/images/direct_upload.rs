use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::http_server::api::images::ingest_error_response;
use crate::http_server::Envelope;
use crate::ingest::IngestError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct DirectUploadResponse {
    pub id: Uuid,
}

/// Single-step upload: creation and payload delivery in one POST.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(account_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, DirectUploadError> {
    // Parse multipart form data
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DirectUploadError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(|s| s.to_string()).ok_or_else(|| {
                DirectUploadError::InvalidRequest("file field has no filename".into())
            })?;
            let data = field
                .bytes()
                .await
                .map_err(|e| DirectUploadError::Multipart(e.to_string()))?;
            file = Some((file_name, data.to_vec()));
        }
    }

    let (file_name, payload) =
        file.ok_or_else(|| DirectUploadError::InvalidRequest("file field is required".into()))?;

    let image_id = state
        .direct_upload(&account_id, &file_name, payload)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(Envelope::success(DirectUploadResponse { id: image_id })),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DirectUploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
}

impl IntoResponse for DirectUploadError {
    fn into_response(self) -> Response {
        match self {
            DirectUploadError::InvalidRequest(msg) | DirectUploadError::Multipart(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            DirectUploadError::Ingest(err) => ingest_error_response(err),
        }
    }
}
