use axum::routing::get;
use axum::Router;

mod healthz;
mod version;

use crate::state::State;

pub fn router() -> Router<State> {
    Router::new()
        .route("/healthz", get(healthz::handler))
        .route("/version", get(version::handler))
}
