use axum::response::{IntoResponse, Response};

pub mod direct_upload;
pub mod request_upload;
pub mod serve;
pub mod upload;

use crate::ingest::IngestError;

/// Shared mapping from core errors to wire responses. Lookup misses are
/// a bare 404 (the emulated API sends no body there); everything the
/// caller cannot act on collapses to an opaque 5xx.
pub(crate) fn ingest_error_response(err: IngestError) -> Response {
    match err {
        IngestError::UnknownAccount | IngestError::NotFound => {
            http::StatusCode::NOT_FOUND.into_response()
        }
        IngestError::InvalidFileName => (
            http::StatusCode::BAD_REQUEST,
            "invalid upload file name".to_string(),
        )
            .into_response(),
        IngestError::Queue(e) => {
            tracing::warn!("upload rejected: {}", e);
            (
                http::StatusCode::SERVICE_UNAVAILABLE,
                "upload queue is saturated".to_string(),
            )
                .into_response()
        }
        IngestError::Database(e) => {
            tracing::error!("database error: {}", e);
            (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response()
        }
        IngestError::Storage(e) => {
            tracing::error!("blob store error: {}", e);
            (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response()
        }
    }
}
