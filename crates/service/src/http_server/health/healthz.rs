use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Readiness {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn handler() -> Response {
    (StatusCode::OK, Json(Readiness { status: "ok" })).into_response()
}
