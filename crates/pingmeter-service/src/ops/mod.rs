//! Operational HTTP endpoints.
//!
//! - `{exposition.path}` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn metrics(State(state): State<AppState>) -> Response {
    // Rendered fully into memory before the socket write starts.
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, pingmeter_core::CONTENT_TYPE)],
        body,
    )
        .into_response()
}
