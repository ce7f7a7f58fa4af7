use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod envelope;
pub mod health;

pub use envelope::Envelope;

use crate::state::State;

const STATUS_PREFIX: &str = "/_status";

/// Upload payload ceiling.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router: the emulated API surface plus status
/// probes, behind permissive CORS and request tracing.
pub fn router(state: State, log_level: tracing::Level) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    Router::new()
        .nest(STATUS_PREFIX, health::router())
        .merge(api::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(cors_layer)
        .layer(trace_layer)
}

/// Serve the router until the shutdown signal fires.
pub async fn run(
    listen_addr: SocketAddr,
    router: Router,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
