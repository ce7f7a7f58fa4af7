use axum::routing::{get, post};
use axum::Router;

pub mod images;

use crate::state::State;

/// Routes mirror the emulated provider's wire paths, so client SDKs can
/// be pointed at the emulator unchanged.
pub fn router() -> Router<State> {
    Router::new()
        .route(
            "/client/v4/accounts/:account_id/images/v2/direct_upload",
            post(images::request_upload::handler),
        )
        .route(
            "/client/v4/accounts/:account_id/images/v1",
            post(images::direct_upload::handler),
        )
        .route("/upload/:image_id", post(images::upload::handler))
        .route(
            "/:account_id/:image_id/:variant",
            get(images::serve::handler),
        )
}
