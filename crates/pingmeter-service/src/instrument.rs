//! Per-request hooks called by request-handling code.
//!
//! - [`ServiceMetrics::record_duration`] : latency histogram, labels (method, path)
//! - [`ServiceMetrics::record_completion`] : request counter, labels (method, path, status)
//! - [`RequestTimer`] : records the duration on drop, exactly once
//! - [`track_http`] : axum middleware calling both hooks
//!
//! None of these return errors or panic; instrumentation must never fail the
//! request it measures.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::ServiceMetrics;

impl ServiceMetrics {
    /// Observe the wall-clock time elapsed since `start`, in seconds.
    pub fn record_duration(&self, method: &str, path: &str, start: Instant) {
        let elapsed = start.elapsed().as_secs_f64();
        self.request_duration().observe([method, path], elapsed);
    }

    /// Count one finished request by outcome.
    pub fn record_completion(&self, method: &str, path: &str, status: u16) {
        let status = status.to_string();
        self.requests_total().increment([method, path, &status]);
    }
}

/// Drop guard around [`ServiceMetrics::record_duration`].
///
/// Records on every exit path of the owning scope: normal return, `?`
/// early return, and panic unwind.
pub struct RequestTimer {
    metrics: Arc<ServiceMetrics>,
    method: String,
    path: String,
    start: Instant,
}

impl RequestTimer {
    pub fn start(metrics: Arc<ServiceMetrics>, method: &str, path: &str) -> Self {
        Self {
            metrics,
            method: method.to_owned(),
            path: path.to_owned(),
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.metrics.record_duration(&self.method, &self.path, self.start);
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// The path label is the matched route template (`/users/:id`) when available,
/// which keeps label cardinality bounded; attach with `Router::route_layer` so
/// the template is resolved. Falls back to the raw URI path otherwise.
pub async fn track_http(
    State(metrics): State<Arc<ServiceMetrics>>,
    matched: Option<MatchedPath>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().as_str().to_owned();
    let path = match matched {
        Some(m) => m.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };

    let timer = RequestTimer::start(Arc::clone(&metrics), &method, &path);
    let resp = next.run(req).await;
    metrics.record_completion(&method, &path, resp.status().as_u16());
    drop(timer);

    resp
}
