//! Axum router wiring for the exposition listener.
//!
//! Exposes a single GET route at the configured path; everything else falls
//! through to axum's 404 / 405 handling.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState, path: &str) -> Router {
    Router::new()
        .route(path, get(ops::metrics))
        .with_state(state)
}
