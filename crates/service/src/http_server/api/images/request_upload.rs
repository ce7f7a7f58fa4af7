use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::http_server::api::images::ingest_error_response;
use crate::http_server::Envelope;
use crate::ingest::IngestError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct RequestUploadResponse {
    pub id: Uuid,
    #[serde(rename = "uploadURL")]
    pub upload_url: Url,
}

/// Token flow, step one: reserve a draft image and hand back the URL
/// the payload should be POSTed to.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, RequestUploadError> {
    let slot = state.request_upload_slot(&account_id).await?;

    Ok((
        http::StatusCode::OK,
        Json(Envelope::result(RequestUploadResponse {
            id: slot.image_id,
            upload_url: slot.upload_url,
        })),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RequestUploadError {
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
}

impl IntoResponse for RequestUploadError {
    fn into_response(self) -> Response {
        let RequestUploadError::Ingest(err) = self;
        ingest_error_response(err)
    }
}
