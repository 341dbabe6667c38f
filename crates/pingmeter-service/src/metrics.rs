//! The service's metric set.
//!
//! Every instrument is registered in [`ServiceMetrics::new`], before any
//! traffic is served. A registration failure there is fatal for the process.

use pingmeter_core::{CounterVec, Gauge, HistogramVec, Registry, Result};

use crate::config::ServiceConfig;

pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const ALIVE_TASKS: &str = "runtime_alive_tasks";

pub struct ServiceMetrics {
    registry: Registry,
    request_duration: HistogramVec<2>,
    requests_total: CounterVec<3>,
    alive_tasks: Gauge,
}

impl ServiceMetrics {
    /// Register all instruments. `buckets` are the latency bounds in seconds.
    pub fn new(buckets: &[f64]) -> Result<Self> {
        let registry = Registry::new();

        let request_duration = registry.register_histogram(
            REQUEST_DURATION,
            "Histogram of HTTP request durations",
            buckets,
            ["method", "path"],
        )?;
        let requests_total = registry.register_counter(
            REQUESTS_TOTAL,
            "Total number of HTTP requests",
            ["method", "path", "status"],
        )?;
        let alive_tasks = registry.register_gauge(ALIVE_TASKS, "Number of alive runtime tasks")?;

        tracing::info!(
            histogram = %request_duration.name(),
            counter = %requests_total.name(),
            gauge = %alive_tasks.name(),
            "metrics registered"
        );

        Ok(Self {
            registry,
            request_duration,
            requests_total,
            alive_tasks,
        })
    }

    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        Self::new(&cfg.histogram.buckets)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render the whole registry in the text exposition format.
    pub fn render(&self) -> String {
        self.registry.render()
    }

    pub fn request_duration(&self) -> &HistogramVec<2> {
        &self.request_duration
    }

    pub fn requests_total(&self) -> &CounterVec<3> {
        &self.requests_total
    }

    pub fn alive_tasks(&self) -> &Gauge {
        &self.alive_tasks
    }
}
