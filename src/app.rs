use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/client", get(handlers::client_status))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
