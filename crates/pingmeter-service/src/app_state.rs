//! Shared state for the exposition endpoint.

use std::sync::Arc;

use crate::metrics::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.metrics)
    }
}
