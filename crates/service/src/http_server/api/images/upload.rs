use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::http_server::api::images::ingest_error_response;
use crate::ingest::IngestError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct UploadAck {
    pub status: &'static str,
}

/// Token flow, step two: accept the payload for a previously issued
/// slot. 404 when the slot is unknown or already consumed.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(image_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    // Parse multipart form data
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| UploadError::InvalidRequest("file field has no filename".into()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
            file = Some((file_name, data.to_vec()));
        }
    }

    let (file_name, payload) =
        file.ok_or_else(|| UploadError::InvalidRequest("file field is required".into()))?;

    state.complete_upload(&image_id, &file_name, payload).await?;

    Ok((http::StatusCode::OK, Json(UploadAck { status: "ok" })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::InvalidRequest(msg) | UploadError::Multipart(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            UploadError::Ingest(err) => ingest_error_response(err),
        }
    }
}
