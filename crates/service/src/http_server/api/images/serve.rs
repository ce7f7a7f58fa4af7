use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::http_server::api::images::ingest_error_response;
use crate::ingest::{IngestError, SERVED_CONTENT_TYPE};
use crate::ServiceState;

/// Serve a published image's converted artifact. The trailing variant
/// segment is accepted for wire compatibility and ignored - no variant
/// generation happens here.
pub async fn handler(
    State(state): State<ServiceState>,
    Path((account_id, image_id, _variant)): Path<(String, Uuid, String)>,
) -> Result<Response, ServeError> {
    let bytes = state.fetch_published(&account_id, &image_id).await?;

    Ok((
        http::StatusCode::OK,
        [(http::header::CONTENT_TYPE, SERVED_CONTENT_TYPE)],
        bytes,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let ServeError::Ingest(err) = self;
        ingest_error_response(err)
    }
}
