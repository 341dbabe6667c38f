//! pingmeter service library entry.
//!
//! This crate wires the core registry into a running service: the HTTP
//! metric set, per-request hooks, the concurrency sampler, and the
//! exposition endpoint. It is consumed by the binary (`main.rs`), by host
//! services that want the hooks, and by integration tests.

pub mod app_state;
pub mod config;
pub mod instrument;
pub mod lifecycle;
pub mod metrics;
pub mod ops;
pub mod router;
pub mod sampler;
pub mod server;

pub use instrument::{track_http, RequestTimer};
pub use metrics::ServiceMetrics;
